//! Per-episode results.

use serde::{Deserialize, Serialize};
use types::{Cash, Tick, Volume};

/// Outcome of one training episode, recorded after terminal liquidation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episodes trained so far, this one included.
    pub episode: u64,
    /// Exploration probability used for every decision in the episode.
    pub epsilon: f64,
    /// Realized profit: trading cash plus liquidation proceeds.
    pub profit: Cash,
    /// CARA utility of `profit`.
    pub utility_reward: f64,
    /// Cash held before liquidation.
    pub trading_cash: Cash,
    /// Signed cash change from liquidation.
    pub liquidation_proceeds: Cash,
    /// Inventory left open when the book ran dry.
    pub residual_inventory: Volume,
    /// Decision epochs run.
    pub epochs: usize,
    /// Ticks run during the episode.
    pub ticks: Tick,
    /// Quote fills during the episode, liquidation excluded.
    pub fills: u64,
}

impl EpisodeSummary {
    /// Check if the episode ended flat.
    pub fn fully_liquidated(&self) -> bool {
        self.residual_inventory == 0
    }
}
