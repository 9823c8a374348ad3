//! Owned per-tick view of the book handed to observers.

use serde::{Deserialize, Serialize};

use crate::money::{Level, Tick, Volume};

/// State dump of the book after a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Tick counter after the update that produced this snapshot.
    pub tick: Tick,
    /// Net signed volume per level, index `i` holding level `i + 1`.
    pub volumes: Vec<Volume>,
    /// Best bid level, `0` when the bid side is empty.
    pub best_bid: Level,
    /// Best ask level, `n + 1` when the ask side is empty.
    pub best_ask: Level,
}

impl BookSnapshot {
    /// Number of levels in the snapshot.
    pub fn levels(&self) -> usize {
        self.volumes.len()
    }

    /// Total resting bid depth (absolute).
    pub fn bid_depth(&self) -> Volume {
        self.volumes.iter().filter(|v| **v < 0).map(|v| -v).sum()
    }

    /// Total resting ask depth.
    pub fn ask_depth(&self) -> Volume {
        self.volumes.iter().filter(|v| **v > 0).sum()
    }
}
