use clap::Parser;

use qpbs_grid_scheduler::logger;
use qpbs_grid_scheduler::run_experiment_from_file;

/// Simulates FIFO, RRRN and merge scheduling of requests on a grid network.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path of the JSON experiment configuration.
    #[arg(short, long, default_value = "config/experiment.json")]
    config: String,

    /// Overrides the seed of the configuration.
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    logger::init();

    log::info!("Loading experiment from '{}'.", cli.config);

    match run_experiment_from_file(&cli.config, cli.seed) {
        Ok(summaries) => {
            log::info!("Experiment finished: {} combination(s) simulated.", summaries.len());
        }
        Err(e) => {
            log::error!("Experiment failed: {}", e);
            std::process::exit(1);
        }
    }
}
