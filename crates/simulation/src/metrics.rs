//! MetricsHook - Built-in hook for aggregating run and episode statistics.
//!
//! Counts logged ticks, tracks peak resting depth, and keeps a running
//! profit tally over trained episodes.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use types::{BookSnapshot, Cash, Tick};

use crate::EpisodeSummary;
use crate::hooks::SimulationHook;

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    /// Logged ticks seen.
    pub total_ticks: u64,
    /// Logged runs completed.
    pub total_runs: u64,
    /// Episodes trained.
    pub total_episodes: u64,
    /// Largest total (bid + ask) depth seen on a single tick.
    pub peak_depth: u64,
    /// Mean profit per episode.
    pub mean_profit: f64,
    /// Best episode profit.
    pub best_profit: Option<Cash>,
    /// Worst episode profit.
    pub worst_profit: Option<Cash>,
    /// Mean terminal utility reward.
    pub mean_utility: f64,
    /// Episodes that ended with inventory the book could not absorb.
    pub unliquidated_episodes: u64,
}

#[derive(Debug, Default)]
struct ProfitTally {
    profit_sum: f64,
    utility_sum: f64,
    best: Option<Cash>,
    worst: Option<Cash>,
    unliquidated: u64,
}

/// Built-in hook for collecting simulation metrics.
///
/// Thread-safe via atomics and a mutex for interior mutability.
///
/// # Example
///
/// ```ignore
/// use simulation::{MetricsHook, Simulation, SimulationConfig};
/// use std::sync::Arc;
///
/// let mut sim = Simulation::new(SimulationConfig::default())?;
/// let metrics = Arc::new(MetricsHook::new());
/// sim.add_hook(metrics.clone());
///
/// for _ in 0..100 {
///     sim.train_episode(0.1);
///     sim.flush();
/// }
/// println!("Mean profit: {:.2}", metrics.snapshot().mean_profit);
/// ```
pub struct MetricsHook {
    tick_count: AtomicU64,
    run_count: AtomicU64,
    episode_count: AtomicU64,
    peak_depth: AtomicU64,
    profits: Mutex<ProfitTally>,
}

impl MetricsHook {
    /// Create a new metrics hook.
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            run_count: AtomicU64::new(0),
            episode_count: AtomicU64::new(0),
            peak_depth: AtomicU64::new(0),
            profits: Mutex::new(ProfitTally::default()),
        }
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_episodes = self.episode_count.load(Ordering::Relaxed);
        let profits = self.profits.lock();

        let (mean_profit, mean_utility) = if total_episodes > 0 {
            (
                profits.profit_sum / total_episodes as f64,
                profits.utility_sum / total_episodes as f64,
            )
        } else {
            (0.0, 0.0)
        };

        MetricsSnapshot {
            total_ticks: self.tick_count.load(Ordering::Relaxed),
            total_runs: self.run_count.load(Ordering::Relaxed),
            total_episodes,
            peak_depth: self.peak_depth.load(Ordering::Relaxed),
            mean_profit,
            best_profit: profits.best,
            worst_profit: profits.worst,
            mean_utility,
            unliquidated_episodes: profits.unliquidated,
        }
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.tick_count.store(0, Ordering::Relaxed);
        self.run_count.store(0, Ordering::Relaxed);
        self.episode_count.store(0, Ordering::Relaxed);
        self.peak_depth.store(0, Ordering::Relaxed);
        *self.profits.lock() = ProfitTally::default();
    }

    /// Update peak value atomically (CAS loop).
    fn update_peak(peak: &AtomicU64, value: u64) {
        let mut current = peak.load(Ordering::Relaxed);
        while value > current {
            match peak.compare_exchange_weak(current, value, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for MetricsHook {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationHook for MetricsHook {
    fn name(&self) -> &str {
        "Metrics"
    }

    fn on_tick_end(&self, snapshot: &BookSnapshot) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        let depth = snapshot.bid_depth() + snapshot.ask_depth();
        Self::update_peak(&self.peak_depth, depth.max(0) as u64);
    }

    fn on_run_end(&self, _ticks: Tick) {
        self.run_count.fetch_add(1, Ordering::Relaxed);
    }

    fn on_episode_end(&self, summary: &EpisodeSummary) {
        let mut profits = self.profits.lock();
        profits.profit_sum += summary.profit.to_float();
        profits.utility_sum += summary.utility_reward;
        profits.best = Some(profits.best.map_or(summary.profit, |b| b.max(summary.profit)));
        profits.worst = Some(profits.worst.map_or(summary.profit, |w| w.min(summary.profit)));
        if !summary.fully_liquidated() {
            profits.unliquidated += 1;
        }
        self.episode_count.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookRunner;
    use std::sync::Arc;

    fn snapshot(volumes: Vec<i64>) -> BookSnapshot {
        BookSnapshot {
            tick: 1,
            volumes,
            best_bid: 0,
            best_ask: 0,
        }
    }

    fn episode(profit: i64, residual: i64) -> EpisodeSummary {
        EpisodeSummary {
            profit: Cash(profit),
            utility_reward: 0.5,
            residual_inventory: residual,
            ..Default::default()
        }
    }

    #[test]
    fn test_metrics_accumulation() {
        let metrics = Arc::new(MetricsHook::new());
        let mut runner = HookRunner::new();
        runner.add(metrics.clone());

        for _ in 0..3 {
            runner.on_tick_end(&snapshot(vec![-2, 0, 3]));
        }
        runner.on_run_end(3);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_ticks, 3);
        assert_eq!(snapshot.total_runs, 1);
        assert_eq!(snapshot.total_episodes, 0);
        assert_eq!(snapshot.mean_profit, 0.0);
        assert_eq!(snapshot.best_profit, None);
    }

    #[test]
    fn test_peak_tracking() {
        let metrics = MetricsHook::new();

        metrics.on_tick_end(&snapshot(vec![-2, 0, 3]));
        metrics.on_tick_end(&snapshot(vec![-10, 0, 30]));
        metrics.on_tick_end(&snapshot(vec![-1, 0, 1]));

        assert_eq!(metrics.snapshot().peak_depth, 40);
    }

    #[test]
    fn test_profit_tally() {
        let metrics = MetricsHook::new();

        metrics.on_episode_end(&episode(100, 0));
        metrics.on_episode_end(&episode(-50, 20));
        metrics.on_episode_end(&episode(250, 0));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_episodes, 3);
        assert!((snapshot.mean_profit - 100.0).abs() < 1e-9);
        assert!((snapshot.mean_utility - 0.5).abs() < 1e-9);
        assert_eq!(snapshot.best_profit, Some(Cash(250)));
        assert_eq!(snapshot.worst_profit, Some(Cash(-50)));
        assert_eq!(snapshot.unliquidated_episodes, 1);
    }

    #[test]
    fn test_reset() {
        let metrics = MetricsHook::new();
        metrics.on_tick_end(&snapshot(vec![-1, 1]));
        metrics.on_episode_end(&episode(10, 0));

        assert_eq!(metrics.snapshot().total_ticks, 1);

        metrics.reset();

        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
