use anyhow::Result;
use clap::Parser;
use grs_sim::engine::{write_report_json, EngineConfig, MetricMode, MonteCarlo};
use grs_sim::spec::{load_spec_from_path, validate};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod cli;

use cli::{Cli, Commands};

#[allow(clippy::too_many_arguments)]
fn run_simulate(
    spec_path: &Path,
    iterations: Option<usize>,
    timesteps: Option<usize>,
    strategy: Option<&str>,
    seed: Option<u64>,
    threads: Option<usize>,
    legacy_metric: bool,
    report_json: Option<&PathBuf>,
) -> Result<()> {
    let mut spec = load_spec_from_path(spec_path)?;

    // CLI flags override spec-file parameters.
    if let Some(iterations) = iterations {
        spec.parameters.iterations = iterations;
    }
    if let Some(timesteps) = timesteps {
        spec.parameters.timesteps = timesteps;
    }
    if let Some(seed) = seed {
        spec.parameters.seed = seed;
    }
    if let Some(threads) = threads {
        spec.parameters.threads = threads;
    }
    if let Some(strategy) = strategy {
        spec.strategy = strategy.to_string();
    }
    validate(&spec)?;

    let mut config = EngineConfig::from_spec(&spec)?;
    if legacy_metric {
        config.metric_mode = MetricMode::FirstIterationLegacy;
    }

    let model = spec.build_model();
    info!(
        components = model.len(),
        spec = %spec_path.display(),
        "loaded simulation spec"
    );

    let report = MonteCarlo::new(config, model).run()?;

    println!("Simulation Results:\n");
    println!("Resilience Metric: {:.6}", report.resilience_metric);
    info!(
        iterations = report.iterations,
        timesteps = report.timesteps,
        strategy = %report.strategy,
        strategy_events = report.strategy_events,
        failed_component_steps = report.failed_component_steps,
        "simulation complete ({})",
        report.diagnostics
    );

    if let Some(path) = report_json {
        write_report_json(path, &report)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn run_validate(spec_path: &Path) -> Result<()> {
    let spec = load_spec_from_path(spec_path)?;
    validate(&spec)?;
    println!(
        "Spec OK: {} component(s), {} iteration(s) x {} timestep(s), strategy '{}'",
        spec.components.len(),
        spec.parameters.iterations,
        spec.parameters.timesteps,
        spec.strategy
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = match &cli.command {
        Commands::Simulate {
            spec,
            iterations,
            timesteps,
            strategy,
            seed,
            threads,
            legacy_metric,
            report_json,
        } => run_simulate(
            spec,
            *iterations,
            *timesteps,
            strategy.as_deref(),
            *seed,
            *threads,
            *legacy_metric,
            report_json.as_ref(),
        ),
        Commands::Validate { spec } => run_validate(spec),
    };

    if let Err(err) = result {
        error!("command failed: {:#}", err);
        std::process::exit(1);
    }
}
