//! Exchange configuration.
//!
//! Defaults open a single `ETH` market. Both settings can be overridden from
//! the environment:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `EXCHANGE_MARKETS` | comma-separated market codes | `ETH` |
//! | `EXCHANGE_ORDER_CAPACITY` | slab slots pre-allocated per book | `10000` |

use std::env;

use crate::error::ConfigError;
use crate::exchange::Market;

pub const MARKETS_VAR: &str = "EXCHANGE_MARKETS";
pub const ORDER_CAPACITY_VAR: &str = "EXCHANGE_ORDER_CAPACITY";

/// Orders pre-allocated per book when nothing else is configured.
pub const DEFAULT_ORDER_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// Markets opened at startup.
    pub markets: Vec<Market>,
    /// Initial slab capacity of each book. The slab still grows past it.
    pub order_capacity: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            markets: vec![Market::eth()],
            order_capacity: DEFAULT_ORDER_CAPACITY,
        }
    }
}

impl ExchangeConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let markets = env::var(MARKETS_VAR).ok();
        let capacity = env::var(ORDER_CAPACITY_VAR).ok();
        Self::from_vars(markets.as_deref(), capacity.as_deref())
    }

    /// Build a config from raw variable values. `None` keeps the default.
    pub fn from_vars(markets: Option<&str>, capacity: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = markets {
            config.markets = parse_markets(raw)?;
        }
        if let Some(raw) = capacity {
            config.order_capacity = raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                var: ORDER_CAPACITY_VAR,
                value: raw.to_string(),
            })?;
        }

        Ok(config)
    }
}

fn parse_markets(raw: &str) -> Result<Vec<Market>, ConfigError> {
    let mut markets: Vec<Market> = Vec::new();
    for code in raw.split(',').filter(|code| !code.trim().is_empty()) {
        let market = Market::new(code).map_err(|source| ConfigError::Market {
            var: MARKETS_VAR,
            source,
        })?;
        if !markets.contains(&market) {
            markets.push(market);
        }
    }

    if markets.is_empty() {
        return Err(ConfigError::NoMarkets(MARKETS_VAR));
    }
    Ok(markets)
}
