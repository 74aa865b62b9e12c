//! NIST SP 800-22 inspired randomness battery for coin-flip sequences.
//!
//! Every test takes a slice of bit values (one `u8` per flip, `0` = tails,
//! anything else = heads) and returns a [`TestResult`] with a p-value, a
//! pass/fail determination, and a letter grade (A through F).

use statrs::distribution::{Binomial, ChiSquared, ContinuousCDF, DiscreteCDF, Normal};
use statrs::function::erf::erfc;

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a single randomness test.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl TestResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Determine pass/fail from p-value against a threshold (default 0.01).
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        match p {
            Some(p) => p >= threshold,
            None => false,
        }
    }

    fn from_p(name: &str, p: f64, statistic: f64, details: String) -> Self {
        Self {
            name: name.to_string(),
            passed: Self::pass_from_p(Some(p), 0.01),
            p_value: Some(p),
            statistic,
            details,
            grade: Self::grade_from_p(Some(p)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn ones(bits: &[u8]) -> usize {
    bits.iter().filter(|&&b| b != 0).count()
}

/// Return a failing `TestResult` when data is too short.
fn insufficient(name: &str, needed: usize, got: usize) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed: false,
        p_value: None,
        statistic: 0.0,
        details: format!("Insufficient data: need {needed}, got {got}"),
        grade: 'F',
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. FREQUENCY TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Monobit frequency -- proportion of heads should be ~50%.
pub fn monobit_frequency(bits: &[u8]) -> TestResult {
    let name = "Monobit Frequency";
    let n = bits.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let s = 2 * ones(bits) as i64 - n as i64;
    let s_obs = (s as f64).abs() / (n as f64).sqrt();
    let p = erfc(s_obs / 2.0_f64.sqrt());
    TestResult::from_p(name, p, s_obs, format!("S={s}, n={n}"))
}

/// Exact binomial test of the head count against a fair coin.
pub fn binomial_proportion(bits: &[u8]) -> TestResult {
    let name = "Binomial Proportion";
    let n = bits.len();
    if n < 20 {
        return insufficient(name, 20, n);
    }
    let k = ones(bits) as u64;
    let dist = Binomial::new(0.5, n as u64).unwrap();
    let lower = dist.cdf(k);
    let upper = if k == 0 { 1.0 } else { dist.sf(k - 1) };
    let p = (2.0 * lower.min(upper)).min(1.0);
    let proportion = k as f64 / n as f64;
    TestResult::from_p(
        name,
        p,
        proportion,
        format!("heads={k}, n={n}, proportion={proportion:.4}"),
    )
}

/// Block frequency -- frequency within 128-bit blocks. Chi-squared test.
pub fn block_frequency(bits: &[u8]) -> TestResult {
    let name = "Block Frequency";
    let block_size: usize = 128;
    let n = bits.len();
    let num_blocks = n / block_size;
    if num_blocks < 10 {
        return insufficient(name, block_size * 10, n);
    }
    let chi2 = 4.0
        * block_size as f64
        * bits
            .chunks_exact(block_size)
            .map(|block| {
                let proportion = ones(block) as f64 / block_size as f64;
                (proportion - 0.5) * (proportion - 0.5)
            })
            .sum::<f64>();
    let dist = ChiSquared::new(num_blocks as f64).unwrap();
    let p = dist.sf(chi2);
    TestResult::from_p(
        name,
        p,
        chi2,
        format!("blocks={num_blocks}, M={block_size}"),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. RUNS TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Runs test -- number of uninterrupted runs of heads or tails.
pub fn runs_test(bits: &[u8]) -> TestResult {
    let name = "Runs Test";
    let n = bits.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let prop = ones(bits) as f64 / n as f64;
    if (prop - 0.5).abs() >= 2.0 / (n as f64).sqrt() {
        return TestResult {
            name: name.to_string(),
            passed: false,
            p_value: Some(0.0),
            statistic: 0.0,
            details: format!("Pre-test failed: proportion={prop:.4}"),
            grade: 'F',
        };
    }
    let runs = 1 + bits
        .windows(2)
        .filter(|w| (w[0] != 0) != (w[1] != 0))
        .count();
    let expected = 2.0 * n as f64 * prop * (1.0 - prop) + 1.0;
    let std = 2.0 * (2.0 * n as f64).sqrt() * prop * (1.0 - prop);
    if std < 1e-10 {
        return TestResult {
            name: name.to_string(),
            passed: false,
            p_value: Some(0.0),
            statistic: 0.0,
            details: "Zero variance".to_string(),
            grade: 'F',
        };
    }
    let z = (runs as f64 - expected).abs() / std;
    let p = erfc(z / 2.0_f64.sqrt());
    TestResult::from_p(
        name,
        p,
        z,
        format!("runs={runs}, expected={expected:.0}"),
    )
}

/// Longest run of heads -- within 8-bit blocks, chi-squared against theoretical probs.
pub fn longest_run_of_ones(bits: &[u8]) -> TestResult {
    let name = "Longest Run of Ones";
    let n = bits.len();
    if n < 128 {
        return insufficient(name, 128, n);
    }
    let block_size = 8;
    let num_blocks = n / block_size;

    let mut observed = [0u64; 4]; // bins: 0, 1, 2, >=3
    for block in bits.chunks_exact(block_size) {
        let mut max_run = 0u32;
        let mut current_run = 0u32;
        for &bit in block {
            if bit != 0 {
                current_run += 1;
                max_run = max_run.max(current_run);
            } else {
                current_run = 0;
            }
        }
        observed[(max_run as usize).min(3)] += 1;
    }

    // Theoretical probabilities for M=8
    let probs = [0.2148, 0.3672, 0.2305, 0.1875];
    let chi2: f64 = observed
        .iter()
        .zip(probs)
        .map(|(&obs, prob)| {
            let expected = prob * num_blocks as f64;
            let diff = obs as f64 - expected;
            diff * diff / expected
        })
        .sum();
    let dist = ChiSquared::new(3.0).unwrap();
    let p = dist.sf(chi2);
    TestResult::from_p(
        name,
        p,
        chi2,
        format!("blocks={num_blocks}, M={block_size}"),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// 3. RANDOM WALK TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Cumulative sums -- maximum excursion of the ±1 random walk.
pub fn cusum_test(bits: &[u8]) -> TestResult {
    let name = "Cumulative Sums";
    let n = bits.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }

    let mut s: i64 = 0;
    let mut z: u64 = 0;
    for &bit in bits {
        s += if bit != 0 { 1 } else { -1 };
        z = z.max(s.unsigned_abs());
    }
    let z = z as f64;
    if z < 1e-10 {
        return TestResult {
            name: name.to_string(),
            passed: true,
            p_value: Some(1.0),
            statistic: 0.0,
            details: format!("max|S|=0, n={n}"),
            grade: 'A',
        };
    }

    let nf = n as f64;
    let sqrt_n = nf.sqrt();
    let norm = Normal::standard();
    let sum_terms = |k_start: i64, k_end: i64, offset: f64| -> f64 {
        (k_start..=k_end)
            .map(|k| {
                let kf = k as f64;
                norm.cdf(((4.0 * kf + offset) * z) / sqrt_n)
                    - norm.cdf(((4.0 * kf + offset - 2.0) * z) / sqrt_n)
            })
            .sum()
    };
    let term1 = sum_terms(
        ((-nf / z + 1.0) / 4.0).floor() as i64,
        ((nf / z - 1.0) / 4.0).floor() as i64,
        1.0,
    );
    let term2 = sum_terms(
        ((-nf / z - 3.0) / 4.0).floor() as i64,
        ((nf / z - 1.0) / 4.0).floor() as i64,
        3.0,
    );
    let p = (1.0 - term1 + term2).clamp(0.0, 1.0);
    TestResult::from_p(name, p, z, format!("max|S|={z:.1}, n={n}"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Battery
// ═══════════════════════════════════════════════════════════════════════════════

/// Run every test in the battery over `bits`.
pub fn run_all_tests(bits: &[u8]) -> Vec<TestResult> {
    let tests: [fn(&[u8]) -> TestResult; 6] = [
        // Frequency (3)
        monobit_frequency,
        binomial_proportion,
        block_frequency,
        // Runs (2)
        runs_test,
        longest_run_of_ones,
        // Random walk (1)
        cusum_test,
    ];
    tests.iter().map(|test_fn| test_fn(bits)).collect()
}

/// Calculate overall quality score (0-100) from test results.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
/// Returns the average across all tests.
pub fn calculate_quality_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}
