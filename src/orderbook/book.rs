//! Single-market limit order book.
//!
//! ## Architecture
//!
//! - **Slab**: arena holding every resting order
//! - **BTreeMap**: price-ordered levels per side; the map is both the level
//!   collection and the price index
//! - **HashMap**: order id to slab key, the "level reference" used to route
//!   cancellations
//!
//! ## Price Ordering
//!
//! - **Bids**: keyed by `Reverse(price)`, best (highest) first
//! - **Asks**: keyed by `price`, best (lowest) first
//!
//! ## Matching
//!
//! Limit orders always rest, even when they cross the spread. Only market
//! orders match, sweeping the opposite side level by level. A market order
//! is accepted only when the opposite side holds enough volume to fill it
//! completely; otherwise nothing is touched.
//!
//! ## Example
//!
//! ```
//! use orderbook_core::orderbook::Orderbook;
//! use orderbook_core::types::{Order, Side};
//!
//! let mut book = Orderbook::with_capacity(1_000);
//! book.place_limit_order(100, Order::limit(Side::Sell, 100, 5)).unwrap();
//! book.place_limit_order(101, Order::limit(Side::Sell, 101, 10)).unwrap();
//!
//! let matches = book.place_market_order(Order::market(Side::Buy, 12)).unwrap();
//! assert_eq!(matches.len(), 2);
//! assert_eq!(book.ask_total_volume(), 3);
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use slab::Slab;
use tracing::{debug, info, warn};

use crate::error::{BookError, BookResult};
use crate::orderbook::{Limit, OrderNode};
use crate::types::{BookSnapshot, LevelSnapshot, Match, Order, OrderType, Side};

/// Limit order book for one market.
#[derive(Debug)]
pub struct Orderbook {
    /// Resting orders; key: slab index
    orders: Slab<OrderNode>,

    /// Bid levels (high to low)
    bids: BTreeMap<Reverse<u64>, Limit>,

    /// Ask levels (low to high)
    asks: BTreeMap<u64, Limit>,

    /// Order id -> slab key, present only while the order rests
    order_index: HashMap<u64, usize>,

    /// Highest id this book has issued, `0` before the first order.
    /// Caller-supplied ids must be above it.
    last_order_id: u64,

    bid_count: usize,
    ask_count: usize,
}

impl Default for Orderbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Orderbook {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a book with arena space for `order_capacity` resting orders.
    ///
    /// ```
    /// use orderbook_core::orderbook::Orderbook;
    ///
    /// let book = Orderbook::with_capacity(100_000);
    /// assert!(book.capacity() >= 100_000);
    /// ```
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(order_capacity),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_index: HashMap::with_capacity(order_capacity),
            last_order_id: 0,
            bid_count: 0,
            ask_count: 0,
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Number of resting orders on both sides
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bid_count
    }

    #[inline]
    pub fn ask_count(&self) -> usize {
        self.ask_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    // ========================================================================
    // Placement
    // ========================================================================

    /// Rest a limit order at `price`.
    ///
    /// The order never matches on entry, even if it crosses the spread.
    /// An order submitted with `id == 0` gets the next book-assigned id.
    /// It joins the tail of its level: queue position follows arrival at the
    /// book, not `Order::timestamp`.
    ///
    /// # Returns
    ///
    /// The id of the resting order.
    ///
    /// # Errors
    ///
    /// `InvalidSize`, `InvalidPrice`, `DuplicateOrderId`, `OrderIdsExhausted`,
    /// or `VolumeOverflow` when the side's total volume would no longer fit in
    /// a `u64`; the book is unchanged on error.
    pub fn place_limit_order(&mut self, price: u64, mut order: Order) -> BookResult<u64> {
        if order.remaining == 0 {
            return Err(BookError::InvalidSize);
        }
        if price == 0 {
            return Err(BookError::InvalidPrice);
        }
        self.check_id(order.id)?;

        let side = order.side();
        // A level never holds more than its side, so this bounds both sums.
        let resting = match side {
            Side::Buy => side_volume(&self.bids),
            Side::Sell => side_volume(&self.asks),
        };
        if resting.and_then(|v| v.checked_add(order.remaining)).is_none() {
            warn!(?side, size = order.remaining, "limit order rejected: volume overflow");
            return Err(BookError::VolumeOverflow {
                size: order.remaining,
                resting: resting.unwrap_or(u64::MAX),
            });
        }

        order.price = price;
        order.set_order_type(OrderType::Limit);
        let order_id = self.assign_id(&mut order);

        let key = self.orders.insert(OrderNode::new(order));
        self.order_index.insert(order_id, key);

        let level = match side {
            Side::Buy => {
                self.bid_count += 1;
                self.bids.entry(Reverse(price)).or_insert_with(|| {
                    debug!(price, "new bid level");
                    Limit::new(Side::Buy, price)
                })
            }
            Side::Sell => {
                self.ask_count += 1;
                self.asks.entry(price).or_insert_with(|| {
                    debug!(price, "new ask level");
                    Limit::new(Side::Sell, price)
                })
            }
        };
        level.add_order(key, &mut self.orders);

        debug!(order_id, ?side, price, level_volume = level.total_volume, "limit order resting");
        Ok(order_id)
    }

    /// Fill a market order against the opposite side, best price first.
    ///
    /// # Returns
    ///
    /// Every match produced, in the order levels and orders were visited.
    ///
    /// # Errors
    ///
    /// `InsufficientLiquidity` when the opposite side holds less than the
    /// order's size. The check happens before any level is touched (and
    /// before an id is assigned), so a rejected order leaves the book as it
    /// was. Ids follow the same rules as `place_limit_order`.
    pub fn place_market_order(&mut self, mut order: Order) -> BookResult<Vec<Match>> {
        if order.remaining == 0 {
            return Err(BookError::InvalidSize);
        }
        self.check_id(order.id)?;

        let side = order.side();
        let available = match side {
            Side::Buy => self.ask_total_volume(),
            Side::Sell => self.bid_total_volume(),
        };
        if order.remaining > available {
            warn!(?side, requested = order.remaining, available, "market order rejected");
            return Err(BookError::InsufficientLiquidity {
                requested: order.remaining,
                available,
            });
        }

        order.price = 0;
        order.set_order_type(OrderType::Market);
        let order_id = self.assign_id(&mut order);

        let (matches, filled) = match side {
            Side::Buy => sweep(&mut self.asks, &mut self.orders, &mut self.order_index, &mut order),
            Side::Sell => sweep(&mut self.bids, &mut self.orders, &mut self.order_index, &mut order),
        };
        match side {
            Side::Buy => self.ask_count -= filled,
            Side::Sell => self.bid_count -= filled,
        }

        info!(order_id, ?side, size = order.size, matches = matches.len(), "market order filled");
        Ok(matches)
    }

    // ========================================================================
    // Cancellation
    // ========================================================================

    /// Cancel a resting order by id.
    ///
    /// # Returns
    ///
    /// The cancelled order with its remaining size at cancellation time.
    ///
    /// # Errors
    ///
    /// `OrderNotFound` if the order is not resting: never placed, already
    /// filled, or already cancelled. Nothing is mutated in that case.
    ///
    /// ```
    /// use orderbook_core::error::BookError;
    /// use orderbook_core::orderbook::Orderbook;
    /// use orderbook_core::types::{Order, Side};
    ///
    /// let mut book = Orderbook::new();
    /// let id = book.place_limit_order(10_000, Order::limit(Side::Buy, 10_000, 8)).unwrap();
    ///
    /// assert_eq!(book.cancel_order(id).unwrap().remaining, 8);
    /// assert_eq!(book.cancel_order(id), Err(BookError::OrderNotFound(id)));
    /// ```
    pub fn cancel_order(&mut self, order_id: u64) -> BookResult<Order> {
        let key = *self
            .order_index
            .get(&order_id)
            .ok_or(BookError::OrderNotFound(order_id))?;
        let node = self.orders.get(key).ok_or(BookError::OrderNotFound(order_id))?;
        let (side, price) = (node.side(), node.price());

        let removed = match side {
            Side::Buy => unlink(&mut self.bids, Reverse(price), key, &mut self.orders),
            Side::Sell => unlink(&mut self.asks, price, key, &mut self.orders),
        };
        if removed.is_none() {
            return Err(BookError::OrderNotFound(order_id));
        }

        self.order_index.remove(&order_id);
        match side {
            Side::Buy => self.bid_count -= 1,
            Side::Sell => self.ask_count -= 1,
        }
        let order = self
            .orders
            .try_remove(key)
            .map(|node| node.order)
            .ok_or(BookError::OrderNotFound(order_id))?;

        info!(order_id, ?side, price, remaining = order.remaining, "order cancelled");
        Ok(order)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Sum of every ask level's volume. O(levels).
    ///
    /// Placement keeps this within `u64`; it saturates rather than wraps.
    pub fn ask_total_volume(&self) -> u64 {
        side_volume(&self.asks).unwrap_or(u64::MAX)
    }

    /// Sum of every bid level's volume. O(levels).
    pub fn bid_total_volume(&self) -> u64 {
        side_volume(&self.bids).unwrap_or(u64::MAX)
    }

    /// Ask levels, lowest price first.
    pub fn asks(&self) -> Vec<LevelSnapshot> {
        self.asks.values().map(|l| l.snapshot(&self.orders)).collect()
    }

    /// Bid levels, highest price first.
    pub fn bids(&self) -> Vec<LevelSnapshot> {
        self.bids.values().map(|l| l.snapshot(&self.orders)).collect()
    }

    /// Ask levels without copying their orders, lowest price first.
    pub fn ask_limits(&self) -> impl Iterator<Item = &Limit> {
        self.asks.values()
    }

    /// Bid levels without copying their orders, highest price first.
    pub fn bid_limits(&self) -> impl Iterator<Item = &Limit> {
        self.bids.values()
    }

    /// Queued orders of a level, oldest first.
    pub fn level_orders<'a>(&'a self, limit: &Limit) -> impl Iterator<Item = &'a Order> {
        limit.orders(&self.orders)
    }

    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            total_bid_volume: self.bid_total_volume(),
            total_ask_volume: self.ask_total_volume(),
            asks: self.asks(),
            bids: self.bids(),
        }
    }

    /// Deterministic fingerprint of every level and resting order.
    pub fn state_root(&self) -> BookResult<[u8; 32]> {
        self.snapshot().state_root()
    }

    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.keys().next().map(|r| r.0)
    }

    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.keys().next().copied()
    }

    /// Best ask minus best bid; `None` if a side is empty or the book is crossed
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    /// A resting order by id
    pub fn order(&self, order_id: u64) -> Option<&Order> {
        let key = self.order_index.get(&order_id)?;
        self.orders.get(*key).map(|node| &node.order)
    }

    /// Price of the level holding a resting order.
    ///
    /// `None` for orders that were filled, cancelled, or never placed.
    pub fn level_of(&self, order_id: u64) -> Option<u64> {
        let key = self.order_index.get(&order_id)?;
        self.orders.get(*key).and_then(|node| node.level)
    }

    #[inline]
    pub fn contains_order(&self, order_id: u64) -> bool {
        self.order_index.contains_key(&order_id)
    }

    /// Id the next auto-assigned order will get, `None` once `u64::MAX`
    /// has been issued.
    #[inline]
    pub fn peek_next_order_id(&self) -> Option<u64> {
        self.last_order_id.checked_add(1)
    }

    /// Drop every resting order. Id assignment continues where it was.
    pub fn clear(&mut self) {
        self.orders.clear();
        self.bids.clear();
        self.asks.clear();
        self.order_index.clear();
        self.bid_count = 0;
        self.ask_count = 0;
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Ids are unique for the book's lifetime: a supplied id must be above
    /// every id issued so far, filled and cancelled orders included.
    fn check_id(&self, order_id: u64) -> BookResult<()> {
        if order_id == 0 {
            if self.last_order_id == u64::MAX {
                return Err(BookError::OrderIdsExhausted);
            }
        } else if order_id <= self.last_order_id {
            return Err(BookError::DuplicateOrderId(order_id));
        }
        Ok(())
    }

    /// Must follow a successful `check_id`.
    fn assign_id(&mut self, order: &mut Order) -> u64 {
        if order.id == 0 {
            order.id = self.last_order_id.saturating_add(1);
        }
        self.last_order_id = order.id;
        order.id
    }
}

/// Checked sum of a side's level volumes.
fn side_volume<K: Ord>(levels: &BTreeMap<K, Limit>) -> Option<u64> {
    levels
        .values()
        .try_fold(0u64, |total, level| total.checked_add(level.total_volume))
}

/// Walk one side best level first, filling `incoming` until it is filled or
/// the side runs dry. Filled resting orders leave the slab and the index;
/// emptied levels leave the side.
///
/// Returns the matches and the number of resting orders fully filled.
fn sweep<K: Ord>(
    levels: &mut BTreeMap<K, Limit>,
    orders: &mut Slab<OrderNode>,
    order_index: &mut HashMap<u64, usize>,
    incoming: &mut Order,
) -> (Vec<Match>, usize) {
    let taker_side = incoming.side();
    let mut matches = Vec::new();
    let mut filled = 0;

    while !incoming.is_filled() {
        let Some(mut entry) = levels.first_entry() else {
            break;
        };
        let level = entry.get_mut();
        let fills = level.fill(incoming, orders);

        for m in &fills {
            let resting_id = m.resting_order_id(taker_side);
            let Some(&key) = order_index.get(&resting_id) else {
                continue;
            };
            if orders.get(key).is_some_and(|node| node.is_filled()) {
                order_index.remove(&resting_id);
                orders.try_remove(key);
                filled += 1;
            }
        }

        if level.is_empty() {
            debug!(price = level.price, side = ?level.side, "level cleared");
            entry.remove();
        }
        matches.extend(fills);
    }

    (matches, filled)
}

/// Remove one order from the level at `price_key`, dropping the level if it
/// empties. `None` when the level or the order is missing.
fn unlink<K: Ord>(
    levels: &mut BTreeMap<K, Limit>,
    price_key: K,
    key: usize,
    orders: &mut Slab<OrderNode>,
) -> Option<u64> {
    let level = levels.get_mut(&price_key)?;
    let removed = level.delete_order(key, orders)?;
    if level.is_empty() {
        debug!(price = level.price, side = ?level.side, "level cleared");
        levels.remove(&price_key);
    }
    Some(removed)
}

// ============================================================================
// Unit Tests
// ============================================================================
