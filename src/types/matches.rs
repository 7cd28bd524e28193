//! Match record produced when an incoming order consumes resting size.
//!
//! ## SSZ Serialization
//!
//! Matches derive `SimpleSerialize` so a serving layer can journal or hash
//! them with the same deterministic encoding used for orders.

use ssz_rs::prelude::*;

use crate::types::price::checked_mul;
use crate::types::Side;

/// One incoming order consuming size from one resting order.
///
/// ## Roles
///
/// The incoming (taker) and resting (maker) ids are mapped onto bid/ask
/// roles by side: a market buy fills as `bid_order_id`, the resting ask it
/// consumed is `ask_order_id`, and the other way round for a market sell.
///
/// ## Price Discovery
///
/// The match always executes at the resting level's price.
///
/// ## Example
///
/// ```
/// use orderbook_core::types::{Match, Side};
///
/// let m = Match::new(1, 2, 5_000_000_000, 10_000_000_000_000);
/// // Seen from a market buy, the counterparty is the resting ask.
/// assert_eq!(m.counterparty(Side::Buy), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Match {
    /// Id of the buying order
    pub bid_order_id: u64,

    /// Id of the selling order
    pub ask_order_id: u64,

    /// Size exchanged, fixed-point
    pub size_filled: u64,

    /// Execution price (the resting level's price), fixed-point
    pub price: u64,
}

impl Match {
    pub fn new(bid_order_id: u64, ask_order_id: u64, size_filled: u64, price: u64) -> Self {
        Self {
            bid_order_id,
            ask_order_id,
            size_filled,
            price,
        }
    }

    /// Build a match from the taker's perspective.
    pub(crate) fn between(taker_side: Side, taker_id: u64, maker_id: u64, size: u64, price: u64) -> Self {
        match taker_side {
            Side::Buy => Self::new(taker_id, maker_id, size, price),
            Side::Sell => Self::new(maker_id, taker_id, size, price),
        }
    }

    /// Id of the order on the other side of the taker.
    pub fn counterparty(&self, taker_side: Side) -> u64 {
        match taker_side {
            Side::Buy => self.ask_order_id,
            Side::Sell => self.bid_order_id,
        }
    }

    /// Id of the resting order, given the taker's side.
    #[inline]
    pub fn resting_order_id(&self, taker_side: Side) -> u64 {
        self.counterparty(taker_side)
    }

    /// Notional value (price * size) in fixed-point, `None` on overflow.
    pub fn notional(&self) -> Option<u64> {
        checked_mul(self.price, self.size_filled)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
