//! Error taxonomy for the simulation pipeline.
//!
//! Every error is pre-flight: it is raised before a single coin is flipped.
//! A debiaser fed a degenerate bias never returns, and that is deliberately
//! not represented here.

/// Errors raised while configuring or invoking the simulation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoinflipError {
    /// Bias probability outside `[0, 1]` (or NaN).
    #[error("Configuration error: bias probability {probability} is outside [0, 1]")]
    Configuration { probability: f64 },

    /// A count argument (`trials`, `sequence_length`) was below 1.
    #[error("Invalid argument: {name} must be at least 1, got {value}")]
    InvalidArgument { name: &'static str, value: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoinflipError>;

/// Reject counts below 1.
pub(crate) fn require_positive(name: &'static str, value: usize) -> Result<usize> {
    if value == 0 {
        return Err(CoinflipError::InvalidArgument { name, value });
    }
    Ok(value)
}
