//! Error types for the book and the market registry.

use thiserror::Error;

use crate::exchange::Market;

/// Failures reported by a single [`crate::Orderbook`].
///
/// None of these leave the book partially mutated: every check runs before
/// the first level is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// A market order asked for more than the opposite side holds.
    #[error("insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: u64, available: u64 },

    /// The order is not resting (never placed, already filled, or already cancelled).
    #[error("order {0} not found")]
    OrderNotFound(u64),

    /// A caller-supplied id is not above every id the book has issued.
    #[error("order id {0} was already issued by this book")]
    DuplicateOrderId(u64),

    /// `u64::MAX` has been issued; no further ids can be assigned.
    #[error("order ids exhausted")]
    OrderIdsExhausted,

    /// Resting the order would push its side's total volume past `u64::MAX`.
    #[error("volume overflow: size {size} on top of {resting} resting")]
    VolumeOverflow { size: u64, resting: u64 },

    #[error("order size must be greater than zero")]
    InvalidSize,

    #[error("limit price must be greater than zero")]
    InvalidPrice,

    #[error("state encoding failed: {0}")]
    Encoding(String),
}

pub type BookResult<T> = Result<T, BookError>;

/// Failures reported by the [`crate::Exchange`] registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    #[error("market {0} not found")]
    MarketNotFound(Market),

    #[error("market {0} already exists")]
    MarketExists(Market),

    /// A previous call panicked while holding this market's lock.
    #[error("order book for market {0} is unavailable")]
    BookUnavailable(Market),

    #[error(transparent)]
    Book(#[from] BookError),
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketParseError {
    #[error("market code is empty")]
    Empty,

    #[error("invalid character {1:?} in market code `{0}`")]
    InvalidChar(String, char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid market in {var}: {source}")]
    Market {
        var: &'static str,
        #[source]
        source: MarketParseError,
    },

    #[error("invalid value for {var}: `{value}`")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{0} lists no markets")]
    NoMarkets(&'static str),
}
