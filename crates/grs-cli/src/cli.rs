use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a Monte Carlo reliability simulation
    Simulate {
        /// Path to the simulation spec file (yaml or json)
        #[arg(long)]
        spec: PathBuf,
        /// Override the number of Monte Carlo iterations
        #[arg(long)]
        iterations: Option<usize>,
        /// Override the number of timesteps per iteration
        #[arg(long)]
        timesteps: Option<usize>,
        /// Override the resilience strategy (backup, load-shedding, demand-response)
        #[arg(long)]
        strategy: Option<String>,
        /// Override the base random seed
        #[arg(long)]
        seed: Option<u64>,
        /// Worker threads (0 = all cores)
        #[arg(long)]
        threads: Option<usize>,
        /// Report the legacy first-iteration metric instead of the mean
        #[arg(long)]
        legacy_metric: bool,
        /// Write the full report as JSON
        #[arg(long)]
        report_json: Option<PathBuf>,
    },
    /// Validate a simulation spec file
    Validate {
        /// Path to the simulation spec file (yaml or json)
        #[arg(long)]
        spec: PathBuf,
    },
}
