//! CLI for coinflip — time the Von Neumann extractor on a biased coin.

mod commands;

use clap::{Args, Parser, Subcommand};
use coinflip_core::{DEFAULT_PROBABILITY, DEFAULT_SEQUENCE_LENGTH, DEFAULT_TRIALS};

#[derive(Parser)]
#[command(name = "coinflip")]
#[command(about = "coinflip — debias a biased coin with the Von Neumann method and time it")]
#[command(version = coinflip_core::VERSION)]
struct Cli {
    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Run timed trials and report average heads and execution time (default)
    Run {
        #[command(flatten)]
        sim: SimArgs,

        /// Number of timed trials (1 = single run)
        #[arg(long, default_value_t = DEFAULT_TRIALS)]
        trials: usize,

        /// Print the result as JSON instead of the two-line summary
        #[arg(long)]
        json: bool,
    },

    /// Generate one debiased sequence and run the randomness battery on it
    Check {
        #[command(flatten)]
        sim: SimArgs,
    },
}

#[derive(Args, Clone, Debug, PartialEq)]
struct SimArgs {
    /// Probability that the biased coin lands tails
    #[arg(long, default_value_t = DEFAULT_PROBABILITY)]
    prob: f64,

    /// Unbiased bits per sequence
    #[arg(long, default_value_t = DEFAULT_SEQUENCE_LENGTH)]
    length: usize,

    /// Seed for a reproducible run (default: time-derived)
    #[arg(long)]
    seed: Option<u64>,
}

impl Default for SimArgs {
    fn default() -> Self {
        Self {
            prob: DEFAULT_PROBABILITY,
            length: DEFAULT_SEQUENCE_LENGTH,
            seed: None,
        }
    }
}

impl Commands {
    /// What a bare `coinflip` invocation runs.
    fn default_run() -> Self {
        Self::Run {
            sim: SimArgs::default(),
            trials: DEFAULT_TRIALS,
            json: false,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or_else(Commands::default_run) {
        Commands::Run { sim, trials, json } => commands::run::run(commands::run::RunCommandConfig {
            probability: sim.prob,
            sequence_length: sim.length,
            trials,
            seed: sim.seed,
            json,
        }),
        Commands::Check { sim } => commands::check::run(sim.prob, sim.length, sim.seed),
    }
}
