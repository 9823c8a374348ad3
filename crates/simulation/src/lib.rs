//! Simulation crate: the episode driver for the order book gym.
//!
//! This crate provides the simulation runner that coordinates:
//! - Market-only runs of the Poisson order flow
//! - Training episodes of the Q-learning market maker
//! - Hook-based observation of ticks and episodes
//!
//! # Architecture
//!
//! A training episode runs in decision epochs:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │         Simulation.train_episode(ε)          │
//! │                                              │
//! │  per epoch:                                  │
//! │    1. Discretize (inventory, epoch)          │
//! │    2. Choose quote shifts (ε-greedy)         │
//! │    3. Decision tick: flow, fills, refresh    │
//! │    4. TD update                              │
//! │    5. Market ticks: flow, fills, refresh     │
//! │                                              │
//! │  then:                                       │
//! │    6. Liquidate residual inventory           │
//! │    7. Terminal CARA update                   │
//! │    8. Hook: on_episode_end                   │
//! │                                              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use simulation::{MetricsHook, Simulation, SimulationConfig};
//! use std::sync::Arc;
//!
//! let mut sim = Simulation::new(SimulationConfig::default().with_seed(42))?;
//! let metrics = Arc::new(MetricsHook::new());
//! sim.add_hook(metrics.clone());
//!
//! let profit = sim.train_episode(0.1);
//! sim.flush();
//! ```

mod config;
mod episode;
pub mod hooks;
mod metrics;
mod runner;

pub use config::SimulationConfig;
pub use episode::EpisodeSummary;
pub use hooks::{HookRunner, NoOpHook, SimulationHook};
pub use metrics::{MetricsHook, MetricsSnapshot};
pub use runner::Simulation;
