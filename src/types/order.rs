//! Order types for the limit order book.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs so the book can be
//! fingerprinted deterministically (see [`crate::types::snapshot`]).
//! Enums are stored as raw `u8` fields for SSZ compatibility.
//!
//! ## Fixed-Point Representation
//!
//! Prices and sizes are stored as u64 scaled by 10^8 (SCALE constant).
//! A market order carries price `0`: it trades at whatever levels it sweeps.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use ssz_rs::prelude::*;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy (bid) or Sell (ask)
///
/// Represented as u8 for SSZ compatibility:
/// - Buy = 0
/// - Sell = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Bid - wants to purchase the asset
    #[default]
    Buy,
    /// Ask - wants to sell the asset
    Sell,
}

impl Side {
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    #[inline]
    pub fn is_bid(self) -> bool {
        self == Side::Buy
    }
}

// ============================================================================
// OrderType enum
// ============================================================================

/// How an order interacts with the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderType {
    /// Rests at its price until filled or cancelled
    #[default]
    Limit,
    /// Consumes resting liquidity at the best available prices, never rests
    Market,
}

impl OrderType {
    pub fn to_u8(self) -> u8 {
        match self {
            OrderType::Limit => 0,
            OrderType::Market => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OrderType::Limit),
            1 => Some(OrderType::Market),
            _ => None,
        }
    }
}

// ============================================================================
// Submission clock
// ============================================================================

static LAST_TIMESTAMP: AtomicU64 = AtomicU64::new(0);

/// Monotonic submission stamp in nanoseconds since the Unix epoch.
///
/// Wall-clock readings are bumped so that two calls never return the same
/// value, even when the clock is coarse or steps backwards.
pub fn next_timestamp() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let mut last = LAST_TIMESTAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_TIMESTAMP.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// An order, either resting in the book or incoming.
///
/// The order never points at the level holding it. The book keeps an
/// `id -> arena key` index instead, so a filled or cancelled order simply
/// disappears from that index.
///
/// ## Example
///
/// ```
/// use orderbook_core::types::{Order, Side};
///
/// // 1 ETH bid at 2000.00000000
/// let order = Order::limit(Side::Buy, 200_000_000_000, 100_000_000);
/// assert_eq!(order.id, 0); // assigned by the book on placement
/// assert!(!order.is_filled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Unique order identifier, `0` until the book assigns one
    pub id: u64,

    /// Order side as u8 (0=Buy, 1=Sell)
    pub side_raw: u8,

    /// Limit price in fixed-point, `0` for market orders
    pub price: u64,

    /// Original size in fixed-point
    pub size: u64,

    /// Remaining size, decremented by fills
    pub remaining: u64,

    /// Submission stamp (ns), breaks ties inside a price level
    pub timestamp: u64,

    /// Order type as u8 (0=Limit, 1=Market)
    pub order_type_raw: u8,
}

impl Order {
    /// Create an order with every field given explicitly.
    ///
    /// Used where timestamps must be reproducible (replays, tests).
    pub fn new(
        id: u64,
        side: Side,
        order_type: OrderType,
        price: u64,
        size: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            id,
            side_raw: side.to_u8(),
            price,
            size,
            remaining: size,
            timestamp,
            order_type_raw: order_type.to_u8(),
        }
    }

    /// New limit order stamped with the submission clock.
    pub fn limit(side: Side, price: u64, size: u64) -> Self {
        Self::new(0, side, OrderType::Limit, price, size, next_timestamp())
    }

    /// New market order stamped with the submission clock.
    pub fn market(side: Side, size: u64) -> Self {
        Self::new(0, side, OrderType::Market, 0, size, next_timestamp())
    }

    /// Builder-style id override for callers that own order identity.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Buy)
    }

    pub fn order_type(&self) -> OrderType {
        OrderType::from_u8(self.order_type_raw).unwrap_or(OrderType::Limit)
    }

    pub(crate) fn set_order_type(&mut self, order_type: OrderType) {
        self.order_type_raw = order_type.to_u8();
    }

    /// True iff nothing remains to be filled
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    pub fn filled_size(&self) -> u64 {
        self.size.saturating_sub(self.remaining)
    }

    /// Fill a portion of this order.
    ///
    /// Returns the size actually filled, clamped to what remains.
    pub fn fill(&mut self, fill_size: u64) -> u64 {
        let actual = fill_size.min(self.remaining);
        self.remaining -= actual;
        actual
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
