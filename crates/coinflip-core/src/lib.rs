//! # coinflip-core
//!
//! **Turn a biased coin into a fair one, and time how long it takes.**
//!
//! `coinflip-core` implements the Von Neumann extractor over a biased
//! Bernoulli source and a timing harness that repeats it across trials.
//!
//! ## Quick Start
//!
//! ```no_run
//! use coinflip_core::{ExperimentRunner, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let mut runner = ExperimentRunner::from_config(&config)?;
//! let result = runner.run(config.trials, config.sequence_length)?;
//! println!("{result}");
//! # Ok::<(), coinflip_core::CoinflipError>(())
//! ```
//!
//! ## Architecture
//!
//! RngStream → BiasedSource → Debiaser → SequenceGenerator → ExperimentRunner
//!
//! Each stage owns the one below it, so a single seeded stream drives the
//! whole run and the same seed replays the same head counts.
//!
//! The pipeline is single-threaded. A coin with bias 0 or 1 makes
//! [`Debiaser::next`] loop forever; callers must keep `0 < p < 1`.

pub mod conditioning;
pub mod config;
pub mod error;
pub mod experiment;
pub mod rng;
pub mod sequence;
pub mod source;

pub use conditioning::{Debiaser, expected_pairs_per_bit, extract_pairs};
pub use config::{
    DEFAULT_PROBABILITY, DEFAULT_SEQUENCE_LENGTH, DEFAULT_TRIALS, SimulationConfig,
};
pub use error::{CoinflipError, Result};
pub use experiment::{ExperimentResult, ExperimentRunner, TrialResult};
pub use rng::RngStream;
pub use sequence::SequenceGenerator;
pub use source::{BiasProbability, BiasedSource, Bit};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
