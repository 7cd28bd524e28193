//! Limit order book.
//!
//! ## Architecture
//!
//! - **Slab-based storage**: O(1) order insertion, removal, and lookup
//! - **Price levels**: one [`Limit`] per price per side, kept in a BTreeMap
//! - **Price-time priority**: FIFO ordering inside each level
//!
//! ## Components
//!
//! - [`OrderNode`]: an `Order` plus its queue links, stored in the slab
//! - [`Limit`]: FIFO queue of orders at a single price
//! - [`Orderbook`]: both sides, placement, matching and cancellation
//!
//! ## Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Place limit order | O(log L) |
//! | Cancel by id | O(log L) |
//! | Market order | O(L + k log L) |
//! | Side total volume | O(L) |
//! | Best bid/ask | O(log L) |
//!
//! L = price levels on a side, k = levels swept.

pub mod book;
pub mod level;
pub mod node;

pub use book::Orderbook;
pub use level::{LevelIter, Limit};
pub use node::OrderNode;
