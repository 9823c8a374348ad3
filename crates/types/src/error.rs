//! Construction-time configuration errors.
//!
//! This is the only fatal failure in the system: once a book and agent are
//! built from a validated configuration, every runtime anomaly resolves to a
//! no-op rather than an error.

/// Errors raised while validating construction parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Too few price levels for the component being built.
    #[error("need at least {min} price levels, got {got}")]
    TooFewLevels { got: usize, min: usize },

    /// An arrival intensity that is zero, negative, or not finite.
    #[error("{name} must be a positive finite rate, got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    /// A learning parameter outside its admissible range.
    #[error("{name} out of range: {value} (expected {expected})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// A size parameter that must be non-zero.
    #[error("{0} must be greater than zero")]
    ZeroSize(&'static str),
}
