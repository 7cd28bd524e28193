//! Stress tests for the order book.
//!
//! These tests verify:
//! 1. Book invariants hold after every operation in long random runs
//! 2. Determinism is preserved across runs
//! 3. The book stays bounded when market orders keep draining it
//!
//! ## Running Stress Tests
//!
//! ```bash
//! # Run all stress tests (release mode recommended)
//! cargo test --release --test stress_test -- --nocapture
//!
//! # Run specific test
//! cargo test --release --test stress_test stress_mixed_operations -- --nocapture
//! ```

use std::time::Instant;

use orderbook_core::{BookError, Order, OrderType, Orderbook, Side};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Operations per mixed run
const STRESS_OP_COUNT: usize = 20_000;

/// Base price: 2000.00000000 (in fixed-point, 10^8 scale)
const BASE_PRICE: u64 = 200_000_000_000;

/// Tick: 0.01 (in fixed-point)
const TICK: u64 = 1_000_000;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

#[derive(Debug, Default)]
struct RunStats {
    placed: usize,
    cancelled: usize,
    market_filled: usize,
    market_rejected: usize,
    matches: usize,
}

fn random_side(rng: &mut ChaCha8Rng) -> Side {
    if rng.gen_bool(0.5) {
        Side::Buy
    } else {
        Side::Sell
    }
}

/// Apply `count` seeded random operations to `book`.
///
/// Timestamps are the operation sequence number, so the same seed always
/// yields the same state root.
fn run_random_sequence(book: &mut Orderbook, seed: u64, count: usize, check_every: usize) -> RunStats {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut stats = RunStats::default();
    let mut resting: Vec<u64> = Vec::new();

    for i in 0..count {
        let ts = i as u64 + 1;
        let roll: f64 = rng.gen();

        if roll < 0.6 {
            // Limit: ±50 ticks around the base price
            let side = random_side(&mut rng);
            let price = BASE_PRICE - 50 * TICK + rng.gen_range(0..=100u64) * TICK;
            let size = rng.gen_range(1..=1_000u64) * 1_000_000;
            let order = Order::new(0, side, OrderType::Limit, price, size, ts);
            let id = book.place_limit_order(price, order).expect("valid limit order");
            resting.push(id);
            stats.placed += 1;
        } else if roll < 0.8 {
            // Cancel: may hit an order a market order already consumed
            if resting.is_empty() {
                continue;
            }
            let idx = rng.gen_range(0..resting.len());
            let id = resting.swap_remove(idx);
            match book.cancel_order(id) {
                Ok(order) => {
                    assert_eq!(order.id, id);
                    assert!(order.remaining > 0);
                    stats.cancelled += 1;
                }
                Err(e) => assert_eq!(e, BookError::OrderNotFound(id)),
            }
        } else {
            let side = random_side(&mut rng);
            let available = match side {
                Side::Buy => book.ask_total_volume(),
                Side::Sell => book.bid_total_volume(),
            };
            // Ask for a bit more than the book holds now and then
            let size = rng.gen_range(1..=available.max(1) + available / 10 + 1);
            let order = Order::new(0, side, OrderType::Market, 0, size, ts);
            let root_before = book.state_root().expect("state root");

            match book.place_market_order(order) {
                Ok(matches) => {
                    let filled: u64 = matches.iter().map(|m| m.size_filled).sum();
                    assert_eq!(filled, size);
                    stats.market_filled += 1;
                    stats.matches += matches.len();
                }
                Err(BookError::InsufficientLiquidity { requested, available: got }) => {
                    assert_eq!(requested, size);
                    assert_eq!(got, available);
                    assert!(size > available);
                    assert_eq!(book.state_root().expect("state root"), root_before);
                    stats.market_rejected += 1;
                }
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        if check_every > 0 && i % check_every == 0 {
            assert_book_consistent(book);
        }
    }

    assert_book_consistent(book);
    stats
}

/// Check every structural invariant visible through the public API.
fn assert_book_consistent(book: &Orderbook) {
    let mut seen = 0usize;

    for (side, limits) in [
        (Side::Sell, book.ask_limits().collect::<Vec<_>>()),
        (Side::Buy, book.bid_limits().collect::<Vec<_>>()),
    ] {
        let mut count = 0usize;
        for pair in limits.windows(2) {
            match side {
                Side::Sell => assert!(pair[0].price < pair[1].price, "asks must ascend"),
                Side::Buy => assert!(pair[0].price > pair[1].price, "bids must descend"),
            }
        }

        for limit in limits {
            assert!(!limit.is_empty(), "empty level at {}", limit.price);
            let orders: Vec<&Order> = book.level_orders(limit).collect();
            assert_eq!(orders.len(), limit.len());

            let volume: u64 = orders.iter().map(|o| o.remaining).sum();
            assert_eq!(volume, limit.total_volume, "level {} volume drift", limit.price);

            for pair in orders.windows(2) {
                assert!(pair[0].timestamp < pair[1].timestamp, "queue out of time order");
            }
            for order in orders {
                assert_eq!(order.side(), side);
                assert_eq!(order.price, limit.price);
                assert!(order.remaining > 0);
                assert_eq!(book.level_of(order.id), Some(limit.price));
                assert!(book.contains_order(order.id));
            }
            count += limit.len();
        }

        match side {
            Side::Sell => assert_eq!(count, book.ask_count()),
            Side::Buy => assert_eq!(count, book.bid_count()),
        }
        seen += count;
    }

    assert_eq!(seen, book.order_count());
}

fn run_deterministic_sequence(seed: u64, count: usize) -> [u8; 32] {
    let mut book = Orderbook::with_capacity(count);
    run_random_sequence(&mut book, seed, count, 0);
    book.state_root().expect("state root")
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Mixed place / cancel / market run with invariant checks along the way.
#[test]
fn stress_mixed_operations() {
    println!("\n=== STRESS TEST: {} Mixed Operations ===\n", STRESS_OP_COUNT);

    let mut book = Orderbook::with_capacity(STRESS_OP_COUNT);
    let start = Instant::now();
    let stats = run_random_sequence(&mut book, 42, STRESS_OP_COUNT, 97);
    let elapsed = start.elapsed();

    println!("  Limits placed:     {:>12}", stats.placed);
    println!("  Cancelled:         {:>12}", stats.cancelled);
    println!("  Market filled:     {:>12}", stats.market_filled);
    println!("  Market rejected:   {:>12}", stats.market_rejected);
    println!("  Matches:           {:>12}", stats.matches);
    println!("  Final book size:   {:>12}", book.order_count());
    println!("  Elapsed time:      {:>12.2?}", elapsed);
    println!("  State root:        {}", hex::encode(book.state_root().unwrap()));

    assert!(stats.placed > 0);
    assert!(stats.cancelled > 0);
    assert!(stats.market_filled > 0);
    assert!(stats.market_rejected > 0);
    assert!(stats.matches > 0);
}

/// Same sequence produces identical state root.
#[test]
fn verify_determinism() {
    const TEST_COUNT: usize = 5_000;
    const SEED: u64 = 12345;

    let root1 = run_deterministic_sequence(SEED, TEST_COUNT);
    let root2 = run_deterministic_sequence(SEED, TEST_COUNT);

    println!("  Run 1 state root: {}", hex::encode(root1));
    println!("  Run 2 state root: {}", hex::encode(root2));
    assert_eq!(root1, root2, "State roots must match for determinism");

    let root3 = run_deterministic_sequence(SEED + 1, TEST_COUNT);
    println!("  Different seed:   {}", hex::encode(root3));
    assert_ne!(root1, root3, "Different seeds should produce different roots");
}

/// Cancel everything that is still resting and expect an empty book.
#[test]
fn stress_cancel_all() {
    let mut book = Orderbook::with_capacity(10_000);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut ids = Vec::new();

    for i in 0..10_000u64 {
        let side = random_side(&mut rng);
        let price = BASE_PRICE + rng.gen_range(0..200u64) * TICK;
        let size = rng.gen_range(1..=100u64);
        let order = Order::new(0, side, OrderType::Limit, price, size, i + 1);
        ids.push(book.place_limit_order(price, order).unwrap());
    }
    assert_eq!(book.order_count(), 10_000);

    // Reverse placement order exercises tail, middle and head removal
    while let Some(id) = ids.pop() {
        book.cancel_order(id).unwrap();
        if ids.len() % 1_000 == 0 {
            assert_book_consistent(&book);
        }
    }

    assert!(book.is_empty());
    assert_eq!(book.bid_levels(), 0);
    assert_eq!(book.ask_levels(), 0);
    assert_eq!(book.bid_total_volume(), 0);
    assert_eq!(book.ask_total_volume(), 0);
}

/// Market orders draining the book keep it bounded and consistent.
#[test]
fn stress_memory_stability() {
    const ITERATIONS: usize = 20_000;
    const MAX_BOOK_SIZE: usize = 5_000;

    let mut book = Orderbook::with_capacity(MAX_BOOK_SIZE);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut max_size_seen = 0;

    for i in 0..ITERATIONS {
        let ts = i as u64 + 1;
        let side = random_side(&mut rng);
        let price = BASE_PRICE + rng.gen_range(0..20u64) * TICK;
        let size = rng.gen_range(1..=100u64);
        book.place_limit_order(price, Order::new(0, side, OrderType::Limit, price, size, ts))
            .unwrap();

        // Every tenth step, eat half of the larger side
        if i % 10 == 9 {
            let (side, available) = if book.ask_total_volume() >= book.bid_total_volume() {
                (Side::Buy, book.ask_total_volume())
            } else {
                (Side::Sell, book.bid_total_volume())
            };
            let order = Order::new(0, side, OrderType::Market, 0, available / 2 + 1, ts);
            book.place_market_order(order).unwrap();
        }

        max_size_seen = max_size_seen.max(book.order_count());
    }

    println!("  Max book size:     {:>12}", max_size_seen);
    println!("  Final book size:   {:>12}", book.order_count());

    assert_book_consistent(&book);
    assert!(
        max_size_seen < MAX_BOOK_SIZE,
        "Book grew too large: {} (max {})",
        max_size_seen,
        MAX_BOOK_SIZE
    );
}
