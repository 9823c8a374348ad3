//! Random event sources.
//!
//! Every random draw in a run goes through one [`EventSource`], consumed in a
//! fixed order, so a run is reproducible from a seed and tests can substitute
//! a scripted sequence.
//!
//! # Sources
//!
//! - [`PoissonSource`]: seeded `StdRng` + `rand_distr::Poisson`
//! - [`ScriptedSource`]: replays fixed counts for deterministic tests

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Poisson};

// =============================================================================
// EventSource Trait
// =============================================================================

/// Source of event counts and uniform draws for one simulation run.
pub trait EventSource: Send {
    /// Number of events of a Poisson process with the given rate over one tick.
    fn poisson(&mut self, rate: f64) -> u64;

    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform index in `[0, bound)`; `0` when `bound == 0`.
    fn below(&mut self, bound: usize) -> usize;
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn poisson(&mut self, rate: f64) -> u64 {
        (**self).poisson(rate)
    }

    fn unit(&mut self) -> f64 {
        (**self).unit()
    }

    fn below(&mut self, bound: usize) -> usize {
        (**self).below(bound)
    }
}

impl<S: EventSource + ?Sized> EventSource for Box<S> {
    fn poisson(&mut self, rate: f64) -> u64 {
        (**self).poisson(rate)
    }

    fn unit(&mut self) -> f64 {
        (**self).unit()
    }

    fn below(&mut self, bound: usize) -> usize {
        (**self).below(bound)
    }
}

// =============================================================================
// PoissonSource
// =============================================================================

/// Seedable pseudo-random source.
#[derive(Debug, Clone)]
pub struct PoissonSource {
    rng: StdRng,
}

impl PoissonSource {
    /// Create a source with a fixed seed (reproducible runs).
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl EventSource for PoissonSource {
    fn poisson(&mut self, rate: f64) -> u64 {
        // Zero-rate processes produce no events and consume no randomness
        if !(rate.is_finite() && rate > 0.0) {
            return 0;
        }
        match Poisson::new(rate) {
            Ok(dist) => {
                let draw: f64 = dist.sample(&mut self.rng);
                draw as u64
            }
            Err(_) => 0,
        }
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    fn below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }
}

// =============================================================================
// ScriptedSource
// =============================================================================

/// Deterministic source replaying a fixed queue of counts.
///
/// Once the queue is exhausted every count is `0`. Uniform draws return a
/// fixed value and index draws a fixed index (clamped to the bound). Every
/// requested rate is recorded so tests can check the draw order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    counts: VecDeque<u64>,
    unit: f64,
    index: usize,
    requested: Vec<f64>,
}

impl ScriptedSource {
    /// Replay `counts` in order.
    pub fn new(counts: impl IntoIterator<Item = u64>) -> Self {
        Self {
            counts: counts.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A source that never produces events.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Fixed value returned by [`EventSource::unit`].
    pub fn with_unit(mut self, unit: f64) -> Self {
        self.unit = unit;
        self
    }

    /// Fixed value returned by [`EventSource::below`].
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Append more counts to the queue.
    pub fn push_counts(&mut self, counts: impl IntoIterator<Item = u64>) {
        self.counts.extend(counts);
    }

    /// Rates requested so far, in order.
    pub fn requested_rates(&self) -> &[f64] {
        &self.requested
    }

    /// Counts not yet consumed.
    pub fn remaining(&self) -> usize {
        self.counts.len()
    }
}

impl EventSource for ScriptedSource {
    fn poisson(&mut self, rate: f64) -> u64 {
        self.requested.push(rate);
        self.counts.pop_front().unwrap_or(0)
    }

    fn unit(&mut self) -> f64 {
        self.unit
    }

    fn below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            0
        } else {
            self.index.min(bound - 1)
        }
    }
}
