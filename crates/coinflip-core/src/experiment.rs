//! Timed experiment runner.
//!
//! Architecture:
//! 1. Validate `trials` and `sequence_length` before touching the stream
//! 2. For each trial, time one `SequenceGenerator::generate` call on a
//!    monotonic clock
//! 3. Fold head count and elapsed time into running totals
//! 4. Emit one immutable [`ExperimentResult`]
//!
//! Per-trial results are never retained; observers see them through
//! [`ExperimentRunner::run_with`].

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::conditioning::{Debiaser, expected_pairs_per_bit};
use crate::config::SimulationConfig;
use crate::error::{Result, require_positive};
use crate::rng::RngStream;
use crate::sequence::SequenceGenerator;
use crate::source::BiasedSource;

/// Outcome of a single timed trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialResult {
    /// Zero-based trial index.
    pub index: usize,
    pub head_count: u64,
    pub elapsed: Duration,
}

/// Aggregate over all trials of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentResult {
    avg_heads: u64,
    mean_time: f64,
    min_time: f64,
    max_time: f64,
    trials: usize,
    sequence_length: usize,
}

impl ExperimentResult {
    /// Mean head count per trial, truncated toward zero (never rounded).
    pub fn avg_heads(&self) -> u64 {
        self.avg_heads
    }

    /// Mean trial duration in seconds.
    pub fn mean_time(&self) -> f64 {
        self.mean_time
    }

    /// Fastest trial in seconds.
    pub fn min_time(&self) -> f64 {
        self.min_time
    }

    /// Slowest trial in seconds.
    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }
}

impl std::fmt::Display for ExperimentResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Average Heads: {}", self.avg_heads)?;
        write!(
            f,
            "Execution Time: {:.3} [s] (min: {:.3}, max: {:.3})",
            self.mean_time, self.min_time, self.max_time
        )
    }
}

/// Running totals for one run.
#[derive(Debug)]
struct Accumulator {
    trials: usize,
    total_heads: u64,
    total_secs: f64,
    min_secs: f64,
    max_secs: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            trials: 0,
            total_heads: 0,
            total_secs: 0.0,
            min_secs: f64::INFINITY,
            max_secs: 0.0,
        }
    }

    fn record(&mut self, trial: &TrialResult) {
        let secs = trial.elapsed.as_secs_f64();
        self.trials += 1;
        self.total_heads += trial.head_count;
        self.total_secs += secs;
        self.min_secs = self.min_secs.min(secs);
        self.max_secs = self.max_secs.max(secs);
    }

    fn finish(self, sequence_length: usize) -> ExperimentResult {
        let n = self.trials as u64;
        // Summation rounding can push the mean a hair outside the extrema.
        let mean = (self.total_secs / self.trials as f64).clamp(self.min_secs, self.max_secs);
        ExperimentResult {
            avg_heads: self.total_heads / n,
            mean_time: mean,
            min_time: self.min_secs,
            max_time: self.max_secs,
            trials: self.trials,
            sequence_length,
        }
    }
}

/// Repeats a [`SequenceGenerator`] over many timed trials.
#[derive(Debug, Clone)]
pub struct ExperimentRunner {
    generator: SequenceGenerator,
}

impl ExperimentRunner {
    pub fn new(generator: SequenceGenerator) -> Self {
        Self { generator }
    }

    /// Build the full pipeline (stream → source → debiaser → generator).
    ///
    /// Validates the whole config up front. Without a seed, the stream is
    /// seeded from the clock.
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let probability = config.validate()?;
        let rng = match config.seed {
            Some(seed) => RngStream::from_seed(seed),
            None => RngStream::from_time(),
        };
        log::debug!(
            "Building runner: p={probability}, seed={}, trials={}, sequence_length={}",
            rng.seed(),
            config.trials,
            config.sequence_length
        );
        let source = BiasedSource::new(probability, rng);
        Ok(Self::new(SequenceGenerator::new(Debiaser::new(source))))
    }

    pub fn generator(&self) -> &SequenceGenerator {
        &self.generator
    }

    /// Seed of the stream this runner consumes.
    pub fn seed(&self) -> u64 {
        self.generator.debiaser().source().rng().seed()
    }

    /// Run `trials` timed repetitions of `sequence_length` unbiased bits.
    pub fn run(&mut self, trials: usize, sequence_length: usize) -> Result<ExperimentResult> {
        self.run_with(trials, sequence_length, |_| {})
    }

    /// Like [`run`](Self::run), handing every [`TrialResult`] to `observer`
    /// as soon as it is recorded.
    pub fn run_with<F>(
        &mut self,
        trials: usize,
        sequence_length: usize,
        mut observer: F,
    ) -> Result<ExperimentResult>
    where
        F: FnMut(&TrialResult),
    {
        require_positive("trials", trials)?;
        require_positive("sequence_length", sequence_length)?;

        let pairs_before = self.generator.debiaser().pairs_drawn();
        let mut acc = Accumulator::new();
        for index in 0..trials {
            let start = Instant::now();
            let head_count = self.generator.generate(sequence_length)?;
            let elapsed = start.elapsed();

            let trial = TrialResult {
                index,
                head_count,
                elapsed,
            };
            log::debug!(
                "Trial {}/{trials}: {head_count} heads in {:.3}s",
                index + 1,
                elapsed.as_secs_f64()
            );
            acc.record(&trial);
            observer(&trial);
        }

        let result = acc.finish(sequence_length);
        self.log_summary(&result, pairs_before);
        Ok(result)
    }

    fn log_summary(&self, result: &ExperimentResult, pairs_before: u64) {
        let debiaser = self.generator.debiaser();
        let pairs = debiaser.pairs_drawn() - pairs_before;
        let bits = (result.trials * result.sequence_length) as f64;
        let expected = expected_pairs_per_bit(debiaser.source().probability());
        log::info!(
            "Run complete: {} trials x {} bits, avg heads {}, mean {:.3}s",
            result.trials,
            result.sequence_length,
            result.avg_heads,
            result.mean_time
        );
        if let Some(expected) = expected {
            log::trace!(
                "Pairs per bit: observed {:.4}, expected {expected:.4}",
                pairs as f64 / bits
            );
        }
    }
}
