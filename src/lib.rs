//! # Orderbook Core
//!
//! Single-market limit order book with price-time priority, plus a small
//! registry that keeps one book per market.
//!
//! ## Architecture
//!
//! - **Types**: Core data structures (Order, Match, snapshots)
//! - **OrderBook**: price levels over a slab of order nodes
//! - **Exchange**: market code to book registry, one lock per book
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical operation sequences produce identical state roots
//! 2. **No Floating Point**: prices and sizes are integers (10^8 scaling by convention)
//! 3. **Pre-allocated Memory**: slab allocation for O(1) order insertion and removal
//! 4. **Atomic Failures**: a rejected operation leaves the book untouched

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Match, BookSnapshot
pub mod types;

/// Order book: price levels and matching
pub mod orderbook;

/// Market registry
pub mod exchange;

pub mod config;
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::ExchangeConfig;
pub use error::{BookError, BookResult, ExchangeError, ExchangeResult};
pub use exchange::{Exchange, Market};
pub use orderbook::{Limit, OrderNode, Orderbook};
pub use types::{BookSnapshot, LevelSnapshot, Match, Order, OrderType, Side};
