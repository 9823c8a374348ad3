//! Simulation hooks for observing run and episode lifecycle events.
//!
//! Hooks are **observers**: they receive snapshots of simulation state at
//! key lifecycle points and cannot modify it. This is the state-dump
//! interface through which file sinks, journals, and metrics consume the
//! simulation without the core knowing about any of them.
//!
//! # Example
//!
//! ```ignore
//! use simulation::hooks::SimulationHook;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use types::BookSnapshot;
//!
//! struct TickCounter {
//!     count: AtomicU64,
//! }
//!
//! impl SimulationHook for TickCounter {
//!     fn name(&self) -> &str { "TickCounter" }
//!
//!     fn on_tick_end(&self, _snapshot: &BookSnapshot) {
//!         self.count.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//! ```

use std::sync::Arc;

use types::{BookSnapshot, Tick};

use crate::EpisodeSummary;

// ─────────────────────────────────────────────────────────────────────────────
// SimulationHook Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for simulation observers.
///
/// Use interior mutability (`Mutex`, `AtomicU64`) for hook-owned state.
///
/// # Lifecycle
///
/// ```text
/// run_market_only(steps, with_logging = true)
///
///   on_run_start(levels)
///   ┌──────────────────────┐
///   │ on_tick_end(snapshot)│ ← once per tick, after the touch refresh
///   └──────────────────────┘
///   on_run_end(ticks)
///
/// train_episode(ε)
///
///   on_episode_end(summary) ← after terminal liquidation
/// ```
pub trait SimulationHook: Send + Sync {
    /// Human-readable name for logging and debugging.
    fn name(&self) -> &str;

    /// Called once before the first tick of a logged run.
    #[allow(unused_variables)]
    fn on_run_start(&self, levels: usize) {}

    /// Called after every tick of a logged run.
    #[allow(unused_variables)]
    fn on_tick_end(&self, snapshot: &BookSnapshot) {}

    /// Called once after the last tick of a logged run.
    #[allow(unused_variables)]
    fn on_run_end(&self, ticks: Tick) {}

    /// Called after every training episode.
    #[allow(unused_variables)]
    fn on_episode_end(&self, summary: &EpisodeSummary) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRunner
// ─────────────────────────────────────────────────────────────────────────────

/// Manages hook registration and sequential invocation.
///
/// Hooks are called in registration order.
#[derive(Default)]
pub struct HookRunner {
    hooks: Vec<Arc<dyn SimulationHook>>,
}

impl HookRunner {
    /// Create a new empty hook runner.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook.
    pub fn add(&mut self, hook: Arc<dyn SimulationHook>) {
        self.hooks.push(hook);
    }

    /// Get the number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Check if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Get hook names for debugging.
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn on_run_start(&self, levels: usize) {
        for hook in &self.hooks {
            hook.on_run_start(levels);
        }
    }

    pub fn on_tick_end(&self, snapshot: &BookSnapshot) {
        for hook in &self.hooks {
            hook.on_tick_end(snapshot);
        }
    }

    pub fn on_run_end(&self, ticks: Tick) {
        for hook in &self.hooks {
            hook.on_run_end(ticks);
        }
    }

    pub fn on_episode_end(&self, summary: &EpisodeSummary) {
        for hook in &self.hooks {
            hook.on_episode_end(summary);
        }
    }
}

impl std::fmt::Debug for HookRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRunner")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in Hooks
// ─────────────────────────────────────────────────────────────────────────────

/// A no-op hook useful for testing.
#[derive(Debug, Default)]
pub struct NoOpHook;

impl SimulationHook for NoOpHook {
    fn name(&self) -> &str {
        "NoOp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingHook {
        run_starts: AtomicU64,
        tick_ends: AtomicU64,
        episodes: AtomicU64,
    }

    impl CountingHook {
        fn new() -> Self {
            Self {
                run_starts: AtomicU64::new(0),
                tick_ends: AtomicU64::new(0),
                episodes: AtomicU64::new(0),
            }
        }
    }

    impl SimulationHook for CountingHook {
        fn name(&self) -> &str {
            "CountingHook"
        }

        fn on_run_start(&self, _levels: usize) {
            self.run_starts.fetch_add(1, Ordering::Relaxed);
        }

        fn on_tick_end(&self, _snapshot: &BookSnapshot) {
            self.tick_ends.fetch_add(1, Ordering::Relaxed);
        }

        fn on_episode_end(&self, _summary: &EpisodeSummary) {
            self.episodes.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records the order in which hooks were called.
    struct OrderHook {
        label: &'static str,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl SimulationHook for OrderHook {
        fn name(&self) -> &str {
            self.label
        }

        fn on_run_end(&self, _ticks: Tick) {
            self.calls.lock().push(self.label);
        }
    }

    fn snapshot() -> BookSnapshot {
        BookSnapshot {
            tick: 1,
            volumes: vec![-1, 0, 1],
            best_bid: 1,
            best_ask: 3,
        }
    }

    #[test]
    fn test_hook_runner_invocation() {
        let hook = Arc::new(CountingHook::new());
        let mut runner = HookRunner::new();
        runner.add(hook.clone());

        runner.on_run_start(3);
        runner.on_tick_end(&snapshot());
        runner.on_tick_end(&snapshot());
        runner.on_episode_end(&EpisodeSummary::default());

        assert_eq!(hook.run_starts.load(Ordering::Relaxed), 1);
        assert_eq!(hook.tick_ends.load(Ordering::Relaxed), 2);
        assert_eq!(hook.episodes.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_multiple_hooks_in_registration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut runner = HookRunner::new();
        for label in ["first", "second", "third"] {
            runner.add(Arc::new(OrderHook {
                label,
                calls: calls.clone(),
            }));
        }

        runner.on_run_end(10);
        assert_eq!(*calls.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_hook_names() {
        let mut runner = HookRunner::new();
        assert!(runner.is_empty());
        runner.add(Arc::new(NoOpHook));
        runner.add(Arc::new(CountingHook::new()));

        assert_eq!(runner.len(), 2);
        assert_eq!(runner.hook_names(), vec!["NoOp", "CountingHook"]);
    }
}
