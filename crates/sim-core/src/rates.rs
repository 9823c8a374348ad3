//! Instantaneous arrival and cancellation intensities per price level.
//!
//! Limit-order intensity grows linearly with distance from the touch on the
//! side the order would rest. Cancellation intensity additionally scales with
//! the standing depth at the level, so empty levels see no cancellations.

use types::{BookConfig, Level};

use crate::order_book::OrderBook;

/// Rates of the four per-level Poisson processes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InstantRates {
    pub limit_buy: f64,
    pub limit_sell: f64,
    pub cancel_buy: f64,
    pub cancel_sell: f64,
}

/// Pure mapping from book state to event intensities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrivalRateModel {
    /// Limit-order intensity λ.
    lambda: f64,
    /// Cancellation intensity θ.
    theta: f64,
    /// Market-order intensity μ.
    mu: f64,
}

impl ArrivalRateModel {
    pub fn new(lambda: f64, theta: f64, mu: f64) -> Self {
        Self { lambda, theta, mu }
    }

    pub fn from_config(config: &BookConfig) -> Self {
        Self::new(config.lambda, config.theta, config.mu)
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Rate of each of the two market-order streams.
    pub fn market_rate(&self) -> f64 {
        self.mu
    }

    /// Rates at `price` given the book's cached touch.
    ///
    /// Buy-side rates are zero at or above the ask, sell-side rates are zero
    /// at or below the bid. Off-grid prices see zero depth.
    pub fn compute_rates(&self, book: &OrderBook, price: Level) -> InstantRates {
        let depth = book.volume(price).unwrap_or(0).unsigned_abs() as f64;
        let mut rates = InstantRates::default();

        if price < book.best_ask() {
            let distance = (book.best_ask() - price) as f64;
            rates.limit_buy = self.lambda * distance;
            rates.cancel_buy = self.theta * distance * depth;
        }

        if price > book.best_bid() {
            let distance = (price - book.best_bid()) as f64;
            rates.limit_sell = self.lambda * distance;
            rates.cancel_sell = self.theta * distance * depth;
        }

        rates
    }
}

impl From<&BookConfig> for ArrivalRateModel {
    fn from(config: &BookConfig) -> Self {
        Self::from_config(config)
    }
}
