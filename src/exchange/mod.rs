//! Per-market registry of order books.
//!
//! ## Serialization
//!
//! Each market owns one [`Orderbook`] behind its own `Mutex`. Every call
//! below holds that lock for its whole duration, so placements,
//! cancellations and snapshots on one market never interleave. Different
//! markets share nothing and proceed independently.
//!
//! ## Example
//!
//! ```
//! use orderbook_core::config::ExchangeConfig;
//! use orderbook_core::exchange::{Exchange, Market};
//! use orderbook_core::types::{Order, Side};
//!
//! let exchange = Exchange::new(&ExchangeConfig::default());
//! let eth = Market::eth();
//!
//! exchange.place_limit_order(&eth, 10_000, Order::limit(Side::Sell, 10_000, 5)).unwrap();
//! let matches = exchange.place_market_order(&eth, Order::market(Side::Buy, 2)).unwrap();
//! assert_eq!(matches[0].price, 10_000);
//! ```

mod market;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use crate::config::ExchangeConfig;
use crate::error::{ExchangeError, ExchangeResult};
use crate::orderbook::Orderbook;
use crate::types::{BookSnapshot, Match, Order};

pub use market::Market;

/// Registry mapping each market to its order book.
#[derive(Debug, Default)]
pub struct Exchange {
    books: HashMap<Market, Arc<Mutex<Orderbook>>>,
    order_capacity: usize,
}

impl Exchange {
    /// Open one empty book per configured market.
    pub fn new(config: &ExchangeConfig) -> Self {
        let mut exchange = Self {
            books: HashMap::with_capacity(config.markets.len()),
            order_capacity: config.order_capacity,
        };
        for market in &config.markets {
            // Duplicates in the config collapse to one book.
            let _ = exchange.add_market(market.clone());
        }
        exchange
    }

    /// Register a new, empty market.
    pub fn add_market(&mut self, market: Market) -> ExchangeResult<()> {
        if self.books.contains_key(&market) {
            return Err(ExchangeError::MarketExists(market));
        }
        info!(%market, capacity = self.order_capacity, "market opened");
        let book = Orderbook::with_capacity(self.order_capacity);
        self.books.insert(market, Arc::new(Mutex::new(book)));
        Ok(())
    }

    /// Registered markets, sorted by code.
    pub fn markets(&self) -> Vec<Market> {
        let mut markets: Vec<Market> = self.books.keys().cloned().collect();
        markets.sort();
        markets
    }

    pub fn contains_market(&self, market: &Market) -> bool {
        self.books.contains_key(market)
    }

    /// Shared handle to a market's book.
    ///
    /// Holders must lock it for the full duration of each operation.
    pub fn book(&self, market: &Market) -> ExchangeResult<Arc<Mutex<Orderbook>>> {
        self.books
            .get(market)
            .cloned()
            .ok_or_else(|| ExchangeError::MarketNotFound(market.clone()))
    }

    /// Run `f` with exclusive access to a market's book.
    pub fn with_book<R>(
        &self,
        market: &Market,
        f: impl FnOnce(&mut Orderbook) -> R,
    ) -> ExchangeResult<R> {
        let book = self
            .books
            .get(market)
            .ok_or_else(|| ExchangeError::MarketNotFound(market.clone()))?;
        let mut guard = lock(market, book)?;
        Ok(f(&mut guard))
    }

    /// Returns the id of the resting order.
    pub fn place_limit_order(&self, market: &Market, price: u64, order: Order) -> ExchangeResult<u64> {
        self.with_book(market, |book| book.place_limit_order(price, order))?
            .map_err(ExchangeError::from)
    }

    pub fn place_market_order(&self, market: &Market, order: Order) -> ExchangeResult<Vec<Match>> {
        self.with_book(market, |book| book.place_market_order(order))?
            .map_err(ExchangeError::from)
    }

    pub fn cancel_order(&self, market: &Market, order_id: u64) -> ExchangeResult<Order> {
        self.with_book(market, |book| book.cancel_order(order_id))?
            .map_err(ExchangeError::from)
    }

    pub fn snapshot(&self, market: &Market) -> ExchangeResult<BookSnapshot> {
        self.with_book(market, |book| book.snapshot())
    }
}

fn lock<'a>(market: &Market, book: &'a Mutex<Orderbook>) -> ExchangeResult<MutexGuard<'a, Orderbook>> {
    book.lock()
        .map_err(|_| ExchangeError::BookUnavailable(market.clone()))
}

// ============================================================================
// Unit Tests
// ============================================================================
