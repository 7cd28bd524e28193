//! Market identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::MarketParseError;

/// Upper-cased market code such as `ETH` or `BTC-USD`.
///
/// ```
/// use orderbook_core::exchange::Market;
///
/// let market: Market = "eth".parse().unwrap();
/// assert_eq!(market.as_str(), "ETH");
/// assert!("".parse::<Market>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Market(String);

impl Market {
    pub fn new(code: &str) -> Result<Self, MarketParseError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(MarketParseError::Empty);
        }
        if let Some(c) = code.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-')) {
            return Err(MarketParseError::InvalidChar(code.to_string(), c));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// The default market every exchange starts with.
    pub fn eth() -> Self {
        Self("ETH".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Market {
    type Err = MarketParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
