//! Fixed-length unbiased sequences.

use crate::conditioning::Debiaser;
use crate::error::{Result, require_positive};
use crate::source::Bit;

/// Draws fixed-length runs of unbiased bits from a [`Debiaser`].
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    debiaser: Debiaser,
}

impl SequenceGenerator {
    pub fn new(debiaser: Debiaser) -> Self {
        Self { debiaser }
    }

    pub fn debiaser(&self) -> &Debiaser {
        &self.debiaser
    }

    /// Draw `length` unbiased bits and count the heads.
    ///
    /// Calls [`Debiaser::next`] exactly `length` times; the result is always
    /// in `[0, length]`. `length == 0` is an invalid argument.
    pub fn generate(&mut self, length: usize) -> Result<u64> {
        let length = require_positive("sequence_length", length)?;
        let mut heads = 0u64;
        for _ in 0..length {
            heads += u64::from(self.debiaser.next().value());
        }
        Ok(heads)
    }

    /// Draw `length` unbiased bits and return them.
    pub fn bits(&mut self, length: usize) -> Result<Vec<Bit>> {
        let length = require_positive("sequence_length", length)?;
        Ok((0..length).map(|_| self.debiaser.next()).collect())
    }
}
