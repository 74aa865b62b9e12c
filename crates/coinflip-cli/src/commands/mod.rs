pub mod check;
pub mod run;

use coinflip_core::{BiasProbability, CoinflipError, ExperimentRunner, SimulationConfig};

/// Build a runner from the config, or report the error and exit with 1.
pub fn make_runner(config: &SimulationConfig) -> ExperimentRunner {
    match ExperimentRunner::from_config(config) {
        Ok(runner) => {
            log::info!(
                "Seed {} (p={}, length={}, trials={})",
                runner.seed(),
                config.probability,
                config.sequence_length,
                config.trials
            );
            runner
        }
        Err(e) => exit_with(&e),
    }
}

/// A coin that always lands the same way never yields an unequal pair.
pub fn warn_if_degenerate(probability: f64) {
    if BiasProbability::new(probability).is_ok_and(|p| p.is_degenerate()) {
        log::warn!(
            "Bias probability {probability} never yields an unequal pair; \
             this run will not finish"
        );
    }
}

/// Print an error to stderr and exit with status 1.
pub fn exit_with(err: &CoinflipError) -> ! {
    eprintln!("Error: {err}");
    if let CoinflipError::Configuration { .. } = err {
        eprintln!("Use --prob with a value in [0, 1].");
    }
    std::process::exit(1);
}
