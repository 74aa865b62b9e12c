//! Simulation parameters and their defaults.

use crate::error::{Result, require_positive};
use crate::source::BiasProbability;

/// Default probability of tails for the biased coin.
pub const DEFAULT_PROBABILITY: f64 = 0.4;
/// Default number of unbiased bits per trial.
pub const DEFAULT_SEQUENCE_LENGTH: usize = 1_000_000;
/// Default number of timed trials.
pub const DEFAULT_TRIALS: usize = 10;

/// Everything needed to build and run one experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Probability of tails, `0 < p < 1` for the run to terminate.
    pub probability: f64,
    /// Unbiased bits drawn per trial.
    pub sequence_length: usize,
    /// Number of timed repetitions.
    pub trials: usize,
    /// Stream seed. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            probability: DEFAULT_PROBABILITY,
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            trials: DEFAULT_TRIALS,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Pre-flight checks; returns the validated probability.
    pub fn validate(&self) -> Result<BiasProbability> {
        let probability = BiasProbability::new(self.probability)?;
        require_positive("trials", self.trials)?;
        require_positive("sequence_length", self.sequence_length)?;
        Ok(probability)
    }
}
