//! Simulation configuration options.

use serde::{Deserialize, Serialize};
use types::{BookConfig, ConfigError, LearningConfig};

/// Configuration for a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Book shape and arrival intensities.
    pub book: BookConfig,

    /// Episode length and learning constants.
    pub learning: LearningConfig,

    /// Seed for the shared event source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Create a configuration from the construction parameters
    /// `(n, λ, θ, μ, timesteps)`, keeping every other constant at its default.
    pub fn new(levels: usize, lambda: f64, theta: f64, mu: f64, timesteps: usize) -> Self {
        Self {
            book: BookConfig::new(levels, lambda, theta, mu),
            learning: LearningConfig::with_timesteps(timesteps),
            seed: None,
        }
    }

    /// Set the book configuration.
    pub fn with_book(mut self, book: BookConfig) -> Self {
        self.book = book;
        self
    }

    /// Set the learning configuration.
    pub fn with_learning(mut self, learning: LearningConfig) -> Self {
        self.learning = learning;
        self
    }

    /// Set the number of decision epochs per episode.
    pub fn with_timesteps(mut self, timesteps: usize) -> Self {
        self.learning.timesteps = timesteps;
        self
    }

    /// Set the event source seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of price levels.
    pub fn levels(&self) -> usize {
        self.book.levels
    }

    /// Validate both halves of the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.book.validate()?;
        self.learning.validate()
    }
}
