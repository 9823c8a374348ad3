//! Monetary and volume types for the discretized book.
//!
//! Prices are integer levels `1..=n`, so every notional (`level * quantity`)
//! is an exact integer. `Cash` keeps that exactness instead of going through
//! floating point; conversion to `f64` happens only where utilities and
//! rewards are computed.

use derive_more::{Add, AddAssign, From, Into, Neg, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A discretized price level (1-based). `0` and `n + 1` are the empty-side sentinels.
pub type Level = usize;

/// Net signed resting volume at a level (negative = bid depth, positive = ask depth).
pub type Volume = i64;

/// Simulation tick counter.
pub type Tick = u64;

// =============================================================================
// Cash
// =============================================================================

/// Signed money balance measured in level units.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
)]
pub struct Cash(pub i64);

impl Cash {
    pub const ZERO: Cash = Cash(0);

    /// Notional value of `quantity` units traded at `level`.
    #[inline]
    pub fn notional(level: Level, quantity: Volume) -> Self {
        Cash(level as i64 * quantity)
    }

    /// Convert to floating-point for reward/utility calculations.
    #[inline]
    pub fn to_float(self) -> f64 {
        self.0 as f64
    }

    /// Raw internal value.
    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }

    /// Check if cash is positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Check if cash is negative.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Debug for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cash({})", self.0)
    }
}

impl fmt::Display for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Allow `cash == 40` comparisons
impl PartialEq<i64> for Cash {
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}
