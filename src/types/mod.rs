//! Core data types for the order book
//!
//! ## Types
//!
//! - [`Order`]: a resting or incoming order
//! - [`Side`]: Buy (bid) or Sell (ask)
//! - [`OrderType`]: Limit or Market
//! - [`Match`]: one fill between an incoming and a resting order
//! - [`LevelSnapshot`] / [`BookSnapshot`]: read-only views of the book
//!
//! ## Fixed-Point Arithmetic
//!
//! All prices and sizes are stored as `u64` scaled by 10^8.
//! Example: 2000.5 is stored as 200_050_000_000u64

mod matches;
mod order;
pub mod price;
pub mod snapshot;

pub use matches::Match;
pub use order::{next_timestamp, Order, OrderType, Side};
pub use snapshot::{BookSnapshot, LevelSnapshot};
