//! Integration tests for coinflip-core.
//!
//! These tests drive the full pipeline:
//! seeded stream → biased source → debiaser → sequence → timed runner.

use coinflip_core::{
    BiasedSource, CoinflipError, Debiaser, ExperimentRunner, RngStream, SequenceGenerator,
    SimulationConfig,
};
use statrs::distribution::{Binomial, DiscreteCDF};

fn config(probability: f64, seed: u64) -> SimulationConfig {
    SimulationConfig {
        probability,
        seed: Some(seed),
        ..Default::default()
    }
}

/// Two-sided exact binomial p-value for `k` heads out of `n` fair flips.
fn fair_coin_p_value(k: u64, n: u64) -> f64 {
    let dist = Binomial::new(0.5, n).unwrap();
    let lower = dist.cdf(k);
    let upper = if k == 0 { 1.0 } else { dist.sf(k - 1) };
    (2.0 * lower.min(upper)).min(1.0)
}

#[test]
fn debiased_output_is_fair_for_any_bias() {
    for (p, seed) in [(0.1, 10), (0.4, 40), (0.9, 90)] {
        let source = BiasedSource::with_probability(p, RngStream::from_seed(seed)).unwrap();
        let mut debiaser = Debiaser::new(source);
        let n = 50_000u64;
        let heads = (0..n).filter(|_| debiaser.next().is_heads()).count() as u64;
        let p_value = fair_coin_p_value(heads, n);
        assert!(
            p_value > 1e-4,
            "p={p}: {heads}/{n} heads, binomial p-value {p_value:.2e}"
        );
    }
}

#[test]
fn raw_source_is_detectably_biased() {
    // Control for the test above: the same check must reject the raw coin.
    let mut source = BiasedSource::with_probability(0.4, RngStream::from_seed(40)).unwrap();
    let n = 50_000u64;
    let heads = (0..n).filter(|_| source.flip().is_heads()).count() as u64;
    assert!(fair_coin_p_value(heads, n) < 1e-10);
}

#[test]
fn same_seed_reproduces_every_trial() {
    let cfg = config(0.4, 2024);
    let mut a = ExperimentRunner::from_config(&cfg).unwrap();
    let mut b = ExperimentRunner::from_config(&cfg).unwrap();

    let mut heads_a = Vec::new();
    let mut heads_b = Vec::new();
    let ra = a.run_with(6, 2_000, |t| heads_a.push(t.head_count)).unwrap();
    let rb = b.run_with(6, 2_000, |t| heads_b.push(t.head_count)).unwrap();

    assert_eq!(heads_a, heads_b);
    assert_eq!(ra.avg_heads(), rb.avg_heads());
}

#[test]
fn different_seeds_diverge() {
    let mut a = ExperimentRunner::from_config(&config(0.4, 1)).unwrap();
    let mut b = ExperimentRunner::from_config(&config(0.4, 2)).unwrap();
    let mut heads_a = Vec::new();
    let mut heads_b = Vec::new();
    a.run_with(4, 5_000, |t| heads_a.push(t.head_count)).unwrap();
    b.run_with(4, 5_000, |t| heads_b.push(t.head_count)).unwrap();
    assert_ne!(heads_a, heads_b);
}

#[test]
fn end_to_end_sanity() {
    let mut runner = ExperimentRunner::from_config(&config(0.4, 7)).unwrap();
    let result = runner.run(5, 1_000).unwrap();
    assert!(
        (450..=550).contains(&result.avg_heads()),
        "avg heads {}",
        result.avg_heads()
    );
    assert!(result.mean_time() > 0.0);
    assert!(result.min_time() <= result.mean_time());
    assert!(result.mean_time() <= result.max_time());
}

#[test]
fn single_trial_collapses_extrema() {
    let mut runner = ExperimentRunner::from_config(&config(0.4, 3)).unwrap();
    let result = runner.run(1, 1_000).unwrap();
    assert_eq!(result.min_time(), result.max_time());
    assert_eq!(result.mean_time(), result.min_time());
}

#[test]
fn out_of_range_bias_fails_before_running() {
    for p in [-0.1, 1.1] {
        let err = BiasedSource::with_probability(p, RngStream::from_seed(0)).unwrap_err();
        assert_eq!(err, CoinflipError::Configuration { probability: p });
        assert!(matches!(
            ExperimentRunner::from_config(&config(p, 0)),
            Err(CoinflipError::Configuration { .. })
        ));
    }
}

#[test]
fn degenerate_bias_constructs_but_never_emits() {
    for p in [0.0, 1.0] {
        let source = BiasedSource::with_probability(p, RngStream::from_seed(0)).unwrap();
        let mut debiaser = Debiaser::new(source);
        assert_eq!(debiaser.next_within(1_000_000), None, "p={p}");
    }
}

#[test]
fn zero_length_sequence_is_invalid() {
    let source = BiasedSource::with_probability(0.4, RngStream::from_seed(0)).unwrap();
    let mut generator = SequenceGenerator::new(Debiaser::new(source));
    assert!(matches!(
        generator.generate(0),
        Err(CoinflipError::InvalidArgument {
            name: "sequence_length",
            value: 0
        })
    ));
    assert_eq!(generator.generate(1).map(|h| h <= 1), Ok(true));
}

#[test]
fn result_serializes_to_json() {
    let mut runner = ExperimentRunner::from_config(&config(0.4, 5)).unwrap();
    let result = runner.run(2, 100).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["trials"], 2);
    assert_eq!(json["sequence_length"], 100);
    assert_eq!(json["avg_heads"], result.avg_heads());
    assert!(json["mean_time"].is_f64());
}

#[test]
#[ignore] // Run with: cargo test -- --ignored
fn default_length_run_is_fair() {
    let mut runner = ExperimentRunner::from_config(&config(0.4, 99)).unwrap();
    let result = runner.run(1, 1_000_000).unwrap();
    let p_value = fair_coin_p_value(result.avg_heads(), 1_000_000);
    assert!(p_value > 1e-4, "binomial p-value {p_value:.2e}");
}
