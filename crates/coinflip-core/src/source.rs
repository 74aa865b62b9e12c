//! Biased coin: the raw, untrusted side of the pipeline.
//!
//! A [`BiasedSource`] produces independent Bernoulli outcomes where tails
//! occurs with probability `p` and heads with probability `1 - p`.

use crate::error::{CoinflipError, Result};
use crate::rng::RngStream;

/// A single coin outcome. `Heads` is the bit value 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Bit {
    Tails = 0,
    Heads = 1,
}

impl Bit {
    /// Numeric value of the bit (0 or 1).
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn is_heads(self) -> bool {
        self == Self::Heads
    }
}

impl From<bool> for Bit {
    fn from(heads: bool) -> Self {
        if heads { Self::Heads } else { Self::Tails }
    }
}

impl From<Bit> for u8 {
    fn from(bit: Bit) -> Self {
        bit.value()
    }
}

impl std::fmt::Display for Bit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tails => write!(f, "T"),
            Self::Heads => write!(f, "H"),
        }
    }
}

/// Probability of tails, validated to lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BiasProbability(f64);

impl BiasProbability {
    /// Validate `p`. NaN and anything outside `[0, 1]` is a configuration error.
    pub fn new(p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(CoinflipError::Configuration { probability: p });
        }
        Ok(Self(p))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// `true` when the coin always lands the same way (p = 0 or p = 1).
    pub fn is_degenerate(self) -> bool {
        self.0 == 0.0 || self.0 == 1.0
    }
}

impl std::fmt::Display for BiasProbability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Biased coin backed by an owned uniform stream.
#[derive(Debug, Clone)]
pub struct BiasedSource {
    probability: BiasProbability,
    rng: RngStream,
}

impl BiasedSource {
    pub fn new(probability: BiasProbability, rng: RngStream) -> Self {
        Self { probability, rng }
    }

    /// Validate a raw probability and build the source in one step.
    pub fn with_probability(p: f64, rng: RngStream) -> Result<Self> {
        Ok(Self::new(BiasProbability::new(p)?, rng))
    }

    pub fn probability(&self) -> BiasProbability {
        self.probability
    }

    /// The underlying stream (for seed/draw inspection).
    pub fn rng(&self) -> &RngStream {
        &self.rng
    }

    /// Flip once: heads if `u >= p`, tails otherwise.
    pub fn flip(&mut self) -> Bit {
        Bit::from(self.rng.next_uniform() >= self.probability.value())
    }
}
