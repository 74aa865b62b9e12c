use std::time::Instant;

use coinflip_core::{
    BiasedSource, Bit, Debiaser, RngStream, SequenceGenerator, SimulationConfig, rng::time_seed,
};
use coinflip_tests::TestResult;

/// Fewest bits every test in the battery can score.
pub const MIN_CHECK_LENGTH: usize = 1280;

pub fn run(probability: f64, length: usize, seed: Option<u64>) {
    if let Some(msg) = length_error(length) {
        eprintln!("{msg}");
        std::process::exit(1);
    }
    let config = SimulationConfig {
        probability,
        sequence_length: length,
        trials: 1,
        seed,
    };
    let bias = match config.validate() {
        Ok(bias) => bias,
        Err(e) => super::exit_with(&e),
    };
    super::warn_if_degenerate(probability);
    let seed = seed.unwrap_or_else(time_seed);
    log::info!("Seed {seed}");

    println!("Running randomness battery on {length} bits (p={bias}, seed={seed})...\n");

    // Raw coin and debiased output start from the same stream.
    let mut raw_source = BiasedSource::new(bias, RngStream::from_seed(seed));
    let raw: Vec<u8> = (0..length).map(|_| raw_source.flip().value()).collect();

    let t0 = Instant::now();
    let mut generator =
        SequenceGenerator::new(Debiaser::new(BiasedSource::new(bias, RngStream::from_seed(seed))));
    let debiased = match generator.bits(length) {
        Ok(bits) => bits.into_iter().map(Bit::value).collect::<Vec<u8>>(),
        Err(e) => super::exit_with(&e),
    };
    log::debug!(
        "Generated {length} bits from {} pairs in {:.3}s",
        generator.debiaser().pairs_drawn(),
        t0.elapsed().as_secs_f64()
    );

    let raw_results = coinflip_tests::run_all_tests(&raw);
    let results = coinflip_tests::run_all_tests(&debiased);

    print_table(&raw_results, &results);

    let score = coinflip_tests::calculate_quality_score(&results);
    let raw_score = coinflip_tests::calculate_quality_score(&raw_results);
    println!("\nQuality score: {score:.0}/100 debiased, {raw_score:.0}/100 raw");

    if !monobit_passed(&results) {
        eprintln!("Debiased output failed the monobit frequency test.");
        std::process::exit(1);
    }
}

/// Reject lengths too short for the battery to produce p-values.
fn length_error(length: usize) -> Option<String> {
    (length < MIN_CHECK_LENGTH).then(|| {
        format!(
            "Error: check needs at least {MIN_CHECK_LENGTH} bits to run every test, got {length}. \
             Use --length {MIN_CHECK_LENGTH} or more."
        )
    })
}

fn print_table(raw: &[TestResult], debiased: &[TestResult]) {
    println!("{}", "=".repeat(68));
    println!(
        "{:<22} {:>10} {:>6}   {:>10} {:>6}",
        "Test", "raw p", "Grade", "debiased p", "Grade"
    );
    println!("{}", "-".repeat(68));
    for (r, d) in raw.iter().zip(debiased) {
        println!(
            "{:<22} {:>10} {:>6}   {:>10} {:>6}",
            d.name,
            format_p(r.p_value),
            r.grade,
            format_p(d.p_value),
            d.grade
        );
    }
}

fn format_p(p: Option<f64>) -> String {
    match p {
        Some(p) => format!("{p:.4}"),
        None => "-".to_string(),
    }
}

fn monobit_passed(results: &[TestResult]) -> bool {
    results
        .iter()
        .find(|r| r.name == "Monobit Frequency")
        .is_some_and(|r| r.passed)
}
