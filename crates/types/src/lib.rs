//! Core types for the order book gym.
//!
//! This crate defines the plain data shared across the workspace:
//! - [`Cash`], [`Level`], [`Volume`], [`Tick`]: units of the discretized book
//! - [`QuoteAction`] / [`ActionSpace`]: the agent's two-shift action grid
//! - [`BookSnapshot`]: the owned per-tick state dump
//! - [`BookConfig`] / [`LearningConfig`]: construction parameters
//! - [`ConfigError`]: the only fatal error in the system

mod action;
mod config;
mod error;
mod money;
mod snapshot;

pub use action::{ActionSpace, QuoteAction};
pub use config::{BookConfig, LearningConfig};
pub use error::ConfigError;
pub use money::{Cash, Level, Tick, Volume};
pub use snapshot::BookSnapshot;
