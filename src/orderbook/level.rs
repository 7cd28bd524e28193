//! Price level: every resting order at one price on one side.
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Fills consume from the head
//! - Any order can be unlinked in O(1) by slab key; its neighbours are
//!   re-linked in place, so the relative order of the rest never changes
//!
//! The order data lives in the book's slab. A `Limit` only holds the queue
//! metadata and the aggregate volume.

use slab::Slab;
use tracing::trace;

use crate::orderbook::OrderNode;
use crate::types::{LevelSnapshot, Match, Order, Side};

/// A price level containing orders at a single price.
#[derive(Debug, Clone)]
pub struct Limit {
    /// Side this level rests on
    pub side: Side,

    /// Price for this level (fixed-point, scaled by 10^8)
    pub price: u64,

    /// Sum of the remaining sizes of queued orders
    pub total_volume: u64,

    /// Oldest order (slab key), first to be filled
    head: Option<usize>,

    /// Newest order (slab key)
    tail: Option<usize>,

    order_count: usize,
}

impl Limit {
    pub fn new(side: Side, price: u64) -> Self {
        Self {
            side,
            price,
            total_volume: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order_count
    }

    /// Slab key of the oldest order
    #[inline]
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    /// Append an order to the tail of the queue.
    ///
    /// Position is arrival order; the order's timestamp is not consulted.
    /// Ignored if `key` is vacant or the node is already queued somewhere.
    pub fn add_order(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let Some(node) = slab.get_mut(key) else {
            return;
        };
        if node.level.is_some() {
            return;
        }

        node.prev = self.tail;
        node.next = None;
        node.level = Some(self.price);
        let size = node.remaining();

        match self.tail.and_then(|tail| slab.get_mut(tail)) {
            Some(tail_node) => tail_node.next = Some(key),
            None => self.head = Some(key),
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_volume = self.total_volume.saturating_add(size);
    }

    /// Unlink an order from the queue by slab key.
    ///
    /// Returns the remaining size the order carried, or `None` (no-op) when
    /// the order is not queued at this level.
    pub fn delete_order(&mut self, key: usize, slab: &mut Slab<OrderNode>) -> Option<u64> {
        let node = slab.get(key)?;
        if node.level != Some(self.price) || node.side() != self.side {
            return None;
        }
        let (prev, next, size) = (node.prev, node.next, node.remaining());

        match prev.and_then(|p| slab.get_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| slab.get_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        let node = slab.get_mut(key)?;
        node.prev = None;
        node.next = None;
        node.level = None;

        self.order_count -= 1;
        self.total_volume = self.total_volume.saturating_sub(size);
        Some(size)
    }

    /// Fill `incoming` against this level, oldest order first.
    ///
    /// Each resting order gives `min(resting, incoming)` remaining size.
    /// Fully filled resting orders are unlinked only after the pass, so the
    /// queue is never restructured while it is being walked. The filled
    /// nodes stay in the slab; the caller owns their removal.
    ///
    /// Returns the matches in time-priority order.
    pub fn fill(&mut self, incoming: &mut Order, slab: &mut Slab<OrderNode>) -> Vec<Match> {
        let taker_side = incoming.side();
        let mut matches = Vec::new();
        let mut filled = Vec::new();

        let mut cursor = self.head;
        while let Some(key) = cursor {
            if incoming.is_filled() {
                break;
            }
            let Some(node) = slab.get_mut(key) else {
                break;
            };
            cursor = node.next;

            let size = node.remaining().min(incoming.remaining);
            node.fill(size);
            incoming.fill(size);
            self.total_volume = self.total_volume.saturating_sub(size);

            trace!(price = self.price, resting = node.order_id(), size, "fill");
            matches.push(Match::between(taker_side, incoming.id, node.order_id(), size, self.price));

            if node.is_filled() {
                filled.push(key);
            }
        }

        for key in filled {
            self.delete_order(key, slab);
        }

        matches
    }

    /// Queued orders, oldest first.
    pub fn orders<'a>(&self, slab: &'a Slab<OrderNode>) -> LevelIter<'a> {
        LevelIter {
            slab,
            cursor: self.head,
        }
    }

    pub fn snapshot(&self, slab: &Slab<OrderNode>) -> LevelSnapshot {
        LevelSnapshot {
            price: self.price,
            total_volume: self.total_volume,
            orders: self.orders(slab).cloned().collect(),
        }
    }
}

/// Walks a level's queue from head to tail.
pub struct LevelIter<'a> {
    slab: &'a Slab<OrderNode>,
    cursor: Option<usize>,
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = &'a Order;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.slab.get(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.order)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
