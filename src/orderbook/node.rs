//! Arena node wrapping a resting order.
//!
//! ## Design
//!
//! `OrderNode` wraps an `Order` with doubly-linked list pointers so a price
//! level can unlink any order in O(1) without disturbing the relative order
//! of the others. Pointers are slab keys (`usize`), not references.
//!
//! ## Slab Integration
//!
//! Per the slab docs (https://docs.rs/slab/0.4.11):
//! - Keys are `usize` values returned by `slab.insert()`
//! - Keys may be reused after `slab.remove()`
//! - O(1) insert, remove, and lookup

use crate::types::{Order, Side};

/// Order node stored in the book's slab.
#[derive(Debug, Clone)]
pub struct OrderNode {
    /// The order data
    pub order: Order,

    /// Newer neighbour in the level queue, `None` at the tail
    pub next: Option<usize>,

    /// Older neighbour in the level queue, `None` at the head
    pub prev: Option<usize>,

    /// Price of the level currently queueing this order.
    /// `None` once the order has been unlinked (filled or cancelled).
    pub level: Option<u64>,
}

impl OrderNode {
    /// Create a new, unlinked node
    ///
    /// ```
    /// use orderbook_core::orderbook::OrderNode;
    /// use orderbook_core::types::{Order, Side};
    ///
    /// let node = OrderNode::new(Order::limit(Side::Buy, 10_000, 5));
    /// assert!(node.is_unlinked());
    /// assert!(node.level.is_none());
    /// ```
    #[inline]
    pub fn new(order: Order) -> Self {
        Self {
            order,
            next: None,
            prev: None,
            level: None,
        }
    }

    /// True when no level holds this node
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.level.is_none() && self.next.is_none() && self.prev.is_none()
    }

    #[inline]
    pub fn order_id(&self) -> u64 {
        self.order.id
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.order.side()
    }

    #[inline]
    pub fn price(&self) -> u64 {
        self.order.price
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.order.remaining
    }

    #[inline]
    pub fn fill(&mut self, size: u64) -> u64 {
        self.order.fill(size)
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.order.is_filled()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
