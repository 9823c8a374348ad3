//! Sim-core: market mechanics for the order book gym.
//!
//! This crate provides the stochastic book-update engine:
//! - Net-volume order book with guarded placement primitives
//! - Arrival/cancellation rate model (non-homogeneous Poisson intensities)
//! - Injectable event sources (seeded Poisson or scripted)
//! - Per-tick market step engine

mod engine;
mod order_book;
mod rates;
mod source;

pub use engine::{FlowSummary, MarketStepEngine};
pub use order_book::OrderBook;
pub use rates::{ArrivalRateModel, InstantRates};
pub use source::{EventSource, PoissonSource, ScriptedSource};
