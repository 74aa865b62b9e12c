use coinflip_core::{ExperimentResult, SimulationConfig};

pub struct RunCommandConfig {
    pub probability: f64,
    pub sequence_length: usize,
    pub trials: usize,
    pub seed: Option<u64>,
    pub json: bool,
}

impl RunCommandConfig {
    fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            probability: self.probability,
            sequence_length: self.sequence_length,
            trials: self.trials,
            seed: self.seed,
        }
    }
}

pub fn run(cfg: RunCommandConfig) {
    let sim = cfg.simulation();
    let mut runner = super::make_runner(&sim);
    super::warn_if_degenerate(sim.probability);

    let result = match runner.run(sim.trials, sim.sequence_length) {
        Ok(result) => result,
        Err(e) => super::exit_with(&e),
    };

    match render(&result, cfg.json) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Failed to serialize result: {e}");
            std::process::exit(1);
        }
    }
}

fn render(result: &ExperimentResult, json: bool) -> serde_json::Result<String> {
    if json {
        serde_json::to_string_pretty(result)
    } else {
        Ok(result.to_string())
    }
}
