//! Configuration types for the book dynamics and the learning agent.
//!
//! Both structs are plain data with serde support so the binary can load
//! them from JSON; `validate()` is the single fail-fast gate before any
//! book or agent is constructed.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

// =============================================================================
// Book Configuration
// =============================================================================

/// Shape and arrival intensities of the simulated book.
///
/// Immutable for the lifetime of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookConfig {
    /// Number of discrete price levels `n`.
    pub levels: usize,
    /// Limit-order intensity λ.
    pub lambda: f64,
    /// Cancellation intensity θ.
    pub theta: f64,
    /// Market-order intensity μ.
    pub mu: f64,
}

impl BookConfig {
    /// Create a new book configuration.
    pub fn new(levels: usize, lambda: f64, theta: f64, mu: f64) -> Self {
        Self {
            levels,
            lambda,
            theta,
            mu,
        }
    }

    /// Check level count and rates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The quote action grid is (n / 2)², empty below two levels.
        if self.levels < 2 {
            return Err(ConfigError::TooFewLevels {
                got: self.levels,
                min: 2,
            });
        }
        positive_rate("lambda", self.lambda)?;
        positive_rate("theta", self.theta)?;
        positive_rate("mu", self.mu)?;
        Ok(())
    }
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            levels: 20,
            lambda: 1.85,
            theta: 0.71,
            mu: 2.0,
        }
    }
}

fn positive_rate(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { name, value })
    }
}

// =============================================================================
// Learning Configuration
// =============================================================================

/// Episode length and the constants of the Q-learning agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Decision epochs per training episode.
    pub timesteps: usize,
    /// TD learning rate.
    pub learning_rate: f64,
    /// Discount factor γ.
    pub discount: f64,
    /// CARA utility offset α (`reward = α - exp(-r * profit)`).
    pub cara_alpha: f64,
    /// Weight `a` on mark-to-market value change in the shaping reward.
    pub value_weight: f64,
    /// Exponent `b` on time-to-go in the inventory term of the shaping reward.
    pub inventory_weight: f64,
    /// CARA risk aversion `r`.
    pub risk_aversion: f64,
    /// Size posted on each leg at the start of every decision epoch.
    pub quote_size: i64,
    /// Pure-market ticks run after the decision tick of each epoch.
    pub market_ticks_per_epoch: usize,
    /// Row stride between inventory tiers in the state encoding.
    pub epoch_stride: usize,
    /// Inventory units per tier.
    pub inventory_tier_width: i64,
    /// Number of inventory tiers (the top tier absorbs everything above it).
    pub inventory_tiers: usize,
}

impl LearningConfig {
    /// Defaults with a custom episode length.
    pub fn with_timesteps(timesteps: usize) -> Self {
        Self {
            timesteps,
            ..Self::default()
        }
    }

    /// Set the learning rate.
    pub fn learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Set the discount factor.
    pub fn discount(mut self, gamma: f64) -> Self {
        self.discount = gamma;
        self
    }

    /// Set the quote size per leg.
    pub fn quote_size(mut self, size: i64) -> Self {
        self.quote_size = size;
        self
    }

    /// Set the number of pure-market ticks per epoch.
    pub fn market_ticks_per_epoch(mut self, ticks: usize) -> Self {
        self.market_ticks_per_epoch = ticks;
        self
    }

    /// Number of Q-table rows (`timesteps * inventory_tiers`).
    pub fn state_count(&self) -> usize {
        self.timesteps * self.inventory_tiers
    }

    /// Check ranges of the learning constants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "learning_rate",
                value: self.learning_rate,
                expected: "(0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(ConfigError::OutOfRange {
                name: "discount",
                value: self.discount,
                expected: "[0, 1]",
            });
        }
        for (name, value) in [
            ("cara_alpha", self.cara_alpha),
            ("value_weight", self.value_weight),
            ("inventory_weight", self.inventory_weight),
            ("risk_aversion", self.risk_aversion),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::OutOfRange {
                    name,
                    value,
                    expected: "a finite number",
                });
            }
        }
        if self.quote_size <= 0 {
            return Err(ConfigError::ZeroSize("quote_size"));
        }
        if self.inventory_tier_width <= 0 {
            return Err(ConfigError::ZeroSize("inventory_tier_width"));
        }
        if self.inventory_tiers == 0 {
            return Err(ConfigError::ZeroSize("inventory_tiers"));
        }
        Ok(())
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            timesteps: 12,
            learning_rate: 0.2,
            discount: 0.6,
            cara_alpha: 1.0,
            value_weight: 0.5,
            inventory_weight: 0.5,
            risk_aversion: 0.001,
            quote_size: 100,
            market_ticks_per_epoch: 9,
            epoch_stride: 12,
            inventory_tier_width: 200,
            inventory_tiers: 3,
        }
    }
}
