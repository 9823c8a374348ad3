//! Central configuration for the lob-gym binary.
//!
//! Wraps the library's `SimulationConfig` with the run-level settings the
//! binary needs: how long to run, where to write, and the exploration
//! schedule for training.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use simulation::SimulationConfig;

/// Master configuration for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GymConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Simulation
    // ─────────────────────────────────────────────────────────────────────────
    /// Book, learning, and seed settings.
    pub simulation: SimulationConfig,

    // ─────────────────────────────────────────────────────────────────────────
    // Market-only runs
    // ─────────────────────────────────────────────────────────────────────────
    /// Ticks for `simulate`.
    pub market_ticks: u64,
    /// State log written by `simulate`.
    pub output: PathBuf,

    // ─────────────────────────────────────────────────────────────────────────
    // Training
    // ─────────────────────────────────────────────────────────────────────────
    /// Episodes for `train`.
    pub episodes: u64,
    /// Exploration probability of the first episode.
    pub epsilon_start: f64,
    /// Exploration probability of the last episode.
    pub epsilon_end: f64,
    /// Market-only ticks run before each episode so the agent meets a populated book.
    pub warmup_ticks: u64,
    /// Optional JSON-lines episode journal.
    pub journal: Option<PathBuf>,
}

impl Default for GymConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            market_ticks: 10_000,
            output: PathBuf::from("output.csv"),
            episodes: 1_000,
            epsilon_start: 1.0,
            epsilon_end: 0.05,
            warmup_ticks: 0,
            journal: None,
        }
    }
}

impl GymConfig {
    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Exploration probability for `episode` (0-based), decaying linearly
    /// from `epsilon_start` to `epsilon_end` across the run.
    pub fn epsilon_for(&self, episode: u64) -> f64 {
        if self.episodes <= 1 {
            return self.epsilon_start;
        }
        let progress = episode.min(self.episodes - 1) as f64 / (self.episodes - 1) as f64;
        self.epsilon_start + (self.epsilon_end - self.epsilon_start) * progress
    }
}
