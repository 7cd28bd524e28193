//! Orderbook demo binary.
//!
//! Opens the configured markets, rests a handful of orders on the first one,
//! sweeps part of the ask side with a market buy and prints the result.
//! Set `RUST_LOG=debug` to watch levels being created and cleared.

use orderbook_core::config::ExchangeConfig;
use orderbook_core::error::ExchangeResult;
use orderbook_core::exchange::{Exchange, Market};
use orderbook_core::types::price::{from_fixed_trimmed, to_fixed, SCALE};
use orderbook_core::types::{BookSnapshot, Order, Side};
use tracing::error;

fn main() {
    tracing_subscriber::fmt::init();

    let config = ExchangeConfig::from_env().unwrap_or_else(|e| {
        error!("{e}, falling back to defaults");
        ExchangeConfig::default()
    });
    let exchange = Exchange::new(&config);
    let market = config.markets.first().cloned().unwrap_or_else(Market::eth);

    println!("===========================================");
    println!("  Orderbook demo: {market}");
    println!("===========================================");
    println!();

    if let Err(e) = run(&exchange, &market) {
        error!("demo failed: {e}");
        std::process::exit(1);
    }
}

fn run(exchange: &Exchange, market: &Market) -> ExchangeResult<()> {
    let px = |s: &str| to_fixed(s).unwrap_or(0);

    for (side, price, size) in [
        (Side::Sell, "2001.5", 3),
        (Side::Sell, "2000", 2),
        (Side::Sell, "2000", 4),
        (Side::Buy, "1999", 5),
        (Side::Buy, "1998.25", 1),
    ] {
        let price = px(price);
        let id = exchange.place_limit_order(market, price, Order::limit(side, price, size * SCALE))?;
        println!("  rested #{id}: {side:?} {size} @ {}", from_fixed_trimmed(price));
    }
    println!();
    print_book(&exchange.snapshot(market)?);

    println!("Market buy 7...");
    let matches = exchange.place_market_order(market, Order::market(Side::Buy, 7 * SCALE))?;
    for m in &matches {
        println!(
            "  ask #{} -> bid #{}: {} @ {}",
            m.ask_order_id,
            m.bid_order_id,
            from_fixed_trimmed(m.size_filled),
            from_fixed_trimmed(m.price)
        );
    }
    println!();

    println!("Market sell 100 (more than the bids hold)...");
    if let Err(e) = exchange.place_market_order(market, Order::market(Side::Sell, 100 * SCALE)) {
        println!("  rejected: {e}");
    }
    println!();

    let snapshot = exchange.snapshot(market)?;
    print_book(&snapshot);
    println!("State root: 0x{}", snapshot.state_root_hex()?);
    Ok(())
}

fn print_book(snapshot: &BookSnapshot) {
    println!("Asks (total {}):", from_fixed_trimmed(snapshot.total_ask_volume));
    for level in snapshot.asks.iter().rev() {
        println!("  {:>10} | {}", from_fixed_trimmed(level.price), from_fixed_trimmed(level.total_volume));
    }
    println!("Bids (total {}):", from_fixed_trimmed(snapshot.total_bid_volume));
    for level in &snapshot.bids {
        println!("  {:>10} | {}", from_fixed_trimmed(level.price), from_fixed_trimmed(level.total_volume));
    }
    println!();
}
