//! Point-in-time views of a book and its deterministic fingerprint.
//!
//! A [`BookSnapshot`] is what a serving layer dumps for "show me the book":
//! both side totals plus every level, best price first, with its orders in
//! queue order.
//!
//! ## State Root
//!
//! The state root is a SHA-256 over the SSZ encoding of every level header
//! (price, volume, order count) and every resting order, asks first then
//! bids, each in priority order. Two books with the same root hold the same
//! orders in the same queues with the same remaining sizes.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::error::{BookError, BookResult};
use crate::types::Order;

/// One price level as seen from outside the book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSnapshot {
    pub price: u64,
    /// Sum of `remaining` across `orders`
    pub total_volume: u64,
    /// Oldest first
    pub orders: Vec<Order>,
}

impl LevelSnapshot {
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Remaining sizes in queue order.
    pub fn sizes(&self) -> Vec<u64> {
        self.orders.iter().map(|o| o.remaining).collect()
    }
}

/// Both sides of a book, best price first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookSnapshot {
    pub total_bid_volume: u64,
    pub total_ask_volume: u64,
    /// Ascending price
    pub asks: Vec<LevelSnapshot>,
    /// Descending price
    pub bids: Vec<LevelSnapshot>,
}

impl BookSnapshot {
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.first().map(|l| l.price)
    }

    pub fn best_bid(&self) -> Option<u64> {
        self.bids.first().map(|l| l.price)
    }

    /// Every resting order, asks then bids, in priority order.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.asks
            .iter()
            .chain(self.bids.iter())
            .flat_map(|level| level.orders.iter())
    }

    /// Deterministic SHA-256 fingerprint of the levels and orders.
    pub fn state_root(&self) -> BookResult<[u8; 32]> {
        let mut buffer = Vec::new();
        for (tag, side) in [(0u8, &self.asks), (1u8, &self.bids)] {
            encode_side(tag, side, &mut buffer)?;
        }
        Ok(compute_hash(&buffer))
    }

    pub fn state_root_hex(&self) -> BookResult<String> {
        Ok(hex::encode(self.state_root()?))
    }
}

fn encode_side(tag: u8, levels: &[LevelSnapshot], buffer: &mut Vec<u8>) -> BookResult<()> {
    buffer.push(tag);
    buffer.extend_from_slice(&(levels.len() as u64).to_le_bytes());
    for level in levels {
        buffer.extend_from_slice(&level.price.to_le_bytes());
        buffer.extend_from_slice(&level.total_volume.to_le_bytes());
        buffer.extend_from_slice(&(level.orders.len() as u64).to_le_bytes());
        for order in &level.orders {
            order
                .serialize(buffer)
                .map_err(|e| BookError::Encoding(e.to_string()))?;
        }
    }
    Ok(())
}

/// SHA-256 of `data` as a fixed 32-byte array.
pub fn compute_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

// ============================================================================
// Unit Tests
// ============================================================================
