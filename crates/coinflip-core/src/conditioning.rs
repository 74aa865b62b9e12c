//! Von Neumann debiasing.
//!
//! ALL unbiasing of coin outcomes lives here. The biased source produces raw
//! outcomes; this module is the single place where they are turned into
//! unbiased bits.
//!
//! # Algorithm
//!
//! Draw two independent outcomes. If they are equal, discard both and draw
//! again. If they differ, emit the second one. For any `0 < p < 1` the two
//! unequal orderings HT and TH each occur with probability `p(1 - p)`, so
//! the emitted bit is exactly fair regardless of `p`.
//!
//! # Termination
//!
//! With `p = 0` or `p = 1` every pair is equal and [`Debiaser::next`] never
//! returns. That is a precondition on the caller, not an error: the
//! extractor cannot tell a slow coin from a constant one. Harnesses that
//! need a bound use [`Debiaser::next_within`].

use crate::source::{BiasProbability, BiasedSource, Bit};

/// Expected number of pair draws per emitted bit: `1 / (2 p (1 - p))`.
///
/// Returns `None` for a degenerate coin, where no bit is ever emitted.
pub fn expected_pairs_per_bit(probability: BiasProbability) -> Option<f64> {
    if probability.is_degenerate() {
        return None;
    }
    let p = probability.value();
    Some(1.0 / (2.0 * p * (1.0 - p)))
}

/// Batch extractor over a recorded run of outcomes.
///
/// Takes non-overlapping pairs: (T,H) → H, (H,T) → T, equal → discard. A
/// trailing unpaired outcome is dropped.
pub fn extract_pairs(outcomes: &[Bit]) -> Vec<Bit> {
    outcomes
        .chunks_exact(2)
        .filter(|pair| pair[0] != pair[1])
        .map(|pair| pair[1])
        .collect()
}

/// Streaming Von Neumann extractor over a [`BiasedSource`].
#[derive(Debug, Clone)]
pub struct Debiaser {
    source: BiasedSource,
    pairs_drawn: u64,
}

impl Debiaser {
    pub fn new(source: BiasedSource) -> Self {
        Self {
            source,
            pairs_drawn: 0,
        }
    }

    pub fn source(&self) -> &BiasedSource {
        &self.source
    }

    /// Total pairs consumed so far, accepted and rejected.
    pub fn pairs_drawn(&self) -> u64 {
        self.pairs_drawn
    }

    /// Next unbiased bit. Blocks forever on a degenerate coin.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Bit {
        loop {
            if let Some(bit) = self.draw_pair() {
                return bit;
            }
        }
    }

    /// Like [`next`](Self::next) but gives up after drawing `max_pairs` equal
    /// pairs, returning `None`. The unbounded contract of `next` is unchanged.
    pub fn next_within(&mut self, max_pairs: u64) -> Option<Bit> {
        (0..max_pairs).find_map(|_| self.draw_pair())
    }

    fn draw_pair(&mut self) -> Option<Bit> {
        let first = self.source.flip();
        let second = self.source.flip();
        self.pairs_drawn += 1;
        (first != second).then_some(second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngStream;

    fn debiaser(p: f64, seed: u64) -> Debiaser {
        let source = BiasedSource::with_probability(p, RngStream::from_seed(seed)).unwrap();
        Debiaser::new(source)
    }

    #[test]
    fn test_extract_pairs_keeps_second_of_unequal() {
        use Bit::{Heads as H, Tails as T};
        let out = extract_pairs(&[T, H, H, T, H, H, T, T, T]);
        assert_eq!(out, vec![H, T]);
    }

    #[test]
    fn test_extract_pairs_empty_and_constant() {
        assert!(extract_pairs(&[]).is_empty());
        assert!(extract_pairs(&[Bit::Heads; 64]).is_empty());
    }

    #[test]
    fn test_expected_pairs_per_bit() {
        let fair = expected_pairs_per_bit(BiasProbability::new(0.5).unwrap()).unwrap();
        assert!((fair - 2.0).abs() < 1e-12);
        let skewed = expected_pairs_per_bit(BiasProbability::new(0.1).unwrap()).unwrap();
        assert!((skewed - 1.0 / 0.18).abs() < 1e-9);
        assert!(expected_pairs_per_bit(BiasProbability::new(0.0).unwrap()).is_none());
        assert!(expected_pairs_per_bit(BiasProbability::new(1.0).unwrap()).is_none());
    }

    #[test]
    fn test_next_matches_batch_extractor() {
        // Streaming and batch forms must agree on the same trajectory.
        let mut stream = debiaser(0.3, 21);
        let streamed: Vec<Bit> = (0..200).map(|_| stream.next()).collect();

        let mut raw = BiasedSource::with_probability(0.3, RngStream::from_seed(21)).unwrap();
        let flips: Vec<Bit> = (0..stream.pairs_drawn() * 2).map(|_| raw.flip()).collect();
        assert_eq!(extract_pairs(&flips), streamed);
    }

    #[test]
    fn test_output_near_fair_for_skewed_coins() {
        for p in [0.1, 0.4, 0.9] {
            let mut d = debiaser(p, 1234);
            let n = 20_000;
            let heads = (0..n).filter(|_| d.next().is_heads()).count();
            let rate = heads as f64 / n as f64;
            // 5 sigma for a fair coin at n = 20k is ~0.0177
            assert!((rate - 0.5).abs() < 0.0177, "p={p}: rate {rate}");
        }
    }

    #[test]
    fn test_degenerate_coin_never_emits_within_cap() {
        for p in [0.0, 1.0] {
            let mut d = debiaser(p, 5);
            assert_eq!(d.next_within(100_000), None, "p={p}");
            assert_eq!(d.pairs_drawn(), 100_000);
        }
    }

    #[test]
    fn test_next_within_zero_cap() {
        let mut d = debiaser(0.5, 5);
        assert_eq!(d.next_within(0), None);
        assert_eq!(d.pairs_drawn(), 0);
    }

    #[test]
    fn test_pairs_drawn_tracks_rejections() {
        let mut d = debiaser(0.4, 77);
        for _ in 0..10_000 {
            d.next();
        }
        // Expected ~2.083 pairs per bit at p = 0.4.
        let per_bit = d.pairs_drawn() as f64 / 10_000.0;
        assert!((per_bit - 2.083).abs() < 0.1, "pairs per bit {per_bit}");
    }
}
