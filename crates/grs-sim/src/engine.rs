//! Monte Carlo simulation engine.
//!
//! Runs the configured number of independent iterations, each over its own
//! private copy of the grid model and its own seeded random substream, and
//! aggregates the energy-not-served resilience metric. Iterations fan out
//! over a rayon thread pool; results are bit-identical for any thread
//! count because the random source is partitioned per iteration index.

use anyhow::Context;
use grs_core::{
    resilience_metric, AnomalyKind, Diagnostics, GridModel, GrsError, GrsResult,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::failure;
use crate::sampler::{sample_demand, sample_renewable_generation};
use crate::spec::SimulationSpec;
use crate::strategy::ResilienceStrategy;

/// How the final reported metric is derived from per-iteration metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricMode {
    /// Mean of the per-iteration metrics.
    Mean,
    /// First iteration's raw metric divided by the iteration count,
    /// reproducing the original model's narrowing for parity runs.
    FirstIterationLegacy,
}

/// Runtime configuration of one simulation run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub n_iterations: usize,
    pub n_timesteps: usize,
    pub delta_t: f64,
    pub imbalance_threshold: f64,
    pub strategy: ResilienceStrategy,
    pub base_seed: u64,
    /// Worker threads; 0 means all cores.
    pub threads: usize,
    pub metric_mode: MetricMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            n_iterations: 100,
            n_timesteps: 96,
            delta_t: 1.0,
            imbalance_threshold: 0.05,
            strategy: ResilienceStrategy::DemandResponse,
            base_seed: 42,
            threads: 0,
            metric_mode: MetricMode::Mean,
        }
    }
}

impl EngineConfig {
    /// Derive a config from a loaded spec file.
    pub fn from_spec(spec: &SimulationSpec) -> GrsResult<Self> {
        Ok(Self {
            n_iterations: spec.parameters.iterations,
            n_timesteps: spec.parameters.timesteps,
            delta_t: spec.parameters.delta_t,
            imbalance_threshold: spec.parameters.imbalance_threshold,
            strategy: spec.resolve_strategy()?,
            base_seed: spec.parameters.seed,
            threads: spec.parameters.threads,
            metric_mode: MetricMode::Mean,
        })
    }
}

/// Result of one independent Monte Carlo iteration.
#[derive(Debug, Clone, Serialize)]
pub struct IterationOutcome {
    pub iteration: usize,
    /// Energy not served at the end of the iteration.
    pub metric: f64,
    /// Number of timesteps where the strategy was dispatched.
    pub strategy_events: usize,
    /// Component-timesteps spent in the failed state.
    pub failed_component_steps: usize,
    pub diagnostics: Diagnostics,
}

/// Aggregated run report consumed by the output boundary.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Final resilience metric per the configured [`MetricMode`].
    pub resilience_metric: f64,
    pub metric_mode: MetricMode,
    pub iterations: usize,
    pub timesteps: usize,
    pub strategy: ResilienceStrategy,
    pub strategy_events: usize,
    pub failed_component_steps: usize,
    pub per_iteration_metrics: Vec<f64>,
    pub diagnostics: Diagnostics,
}

/// Monte Carlo reliability engine.
pub struct MonteCarlo {
    config: EngineConfig,
    model: GridModel,
}

impl MonteCarlo {
    pub fn new(config: EngineConfig, model: GridModel) -> Self {
        Self { config, model }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run all iterations and aggregate the report.
    pub fn run(&self) -> GrsResult<SimulationReport> {
        if self.model.is_empty() {
            return Err(GrsError::Input(
                "simulation requires at least one component".into(),
            ));
        }
        if self.config.n_iterations == 0 || self.config.n_timesteps == 0 {
            return Err(GrsError::Config(
                "iterations and timesteps must both be >= 1".into(),
            ));
        }

        let thread_count = if self.config.threads == 0 {
            num_cpus::get()
        } else {
            self.config.threads
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .build()
            .context("building rayon thread pool for simulation iterations")?;

        info!(
            iterations = self.config.n_iterations,
            timesteps = self.config.n_timesteps,
            strategy = %self.config.strategy,
            threads = thread_count,
            "starting Monte Carlo simulation"
        );

        let outcomes: GrsResult<Vec<IterationOutcome>> = pool.install(|| {
            (0..self.config.n_iterations)
                .into_par_iter()
                .map(|iteration| self.run_iteration(iteration))
                .collect()
        });
        let outcomes = outcomes?;

        let per_iteration_metrics: Vec<f64> =
            outcomes.iter().map(|outcome| outcome.metric).collect();
        let strategy_events = outcomes.iter().map(|o| o.strategy_events).sum();
        let failed_component_steps = outcomes.iter().map(|o| o.failed_component_steps).sum();
        let mut diagnostics = Diagnostics::new();
        for outcome in &outcomes {
            diagnostics.merge(&outcome.diagnostics);
        }

        let resilience_metric = match self.config.metric_mode {
            MetricMode::Mean => {
                per_iteration_metrics.iter().sum::<f64>() / per_iteration_metrics.len() as f64
            }
            MetricMode::FirstIterationLegacy => {
                per_iteration_metrics[0] / self.config.n_iterations as f64
            }
        };

        Ok(SimulationReport {
            resilience_metric,
            metric_mode: self.config.metric_mode,
            iterations: self.config.n_iterations,
            timesteps: self.config.n_timesteps,
            strategy: self.config.strategy,
            strategy_events,
            failed_component_steps,
            per_iteration_metrics,
            diagnostics,
        })
    }

    /// One independent trial over the full timestep horizon.
    ///
    /// The substream seed is `base_seed + iteration`, so trials are
    /// reproducible and independent of how they are scheduled onto
    /// threads.
    fn run_iteration(&self, iteration: usize) -> GrsResult<IterationOutcome> {
        let mut model = self.model.clone();
        model.reset();
        let mut rng = StdRng::seed_from_u64(self.config.base_seed.wrapping_add(iteration as u64));
        let mut diagnostics = Diagnostics::new();

        // Sample the full demand/generation series for this iteration.
        let timesteps = self.config.n_timesteps;
        let mut demand = Vec::with_capacity(timesteps);
        let mut generation = Vec::with_capacity(timesteps);
        for t in 0..timesteps {
            demand.push(sample_demand(
                t,
                iteration,
                self.config.n_iterations,
                model.components(),
                &mut rng,
            ));
            let g = sample_renewable_generation(t, model.components(), &mut rng);
            if g < 0.0 {
                if diagnostics.count(AnomalyKind::NegativeGeneration) == 0 {
                    warn!(iteration, timestep = t, generation = g, "sampled negative generation");
                }
                diagnostics.record(AnomalyKind::NegativeGeneration);
            }
            generation.push(g);
        }

        // Advance the failure state machine across the horizon.
        let trace = failure::run_horizon(&mut model, self.config.delta_t, timesteps, &mut rng);
        let failed_component_steps = trace
            .iter()
            .map(|row| row.iter().filter(|status| status.is_failed()).count())
            .sum();

        // Imbalance sweep: dispatch the configured strategy on every
        // timestep whose imbalance exceeds the threshold.
        let mut strategy_events = 0;
        for t in 0..timesteps {
            let imbalance = demand[t] - generation[t];
            if imbalance > self.config.imbalance_threshold {
                debug!(iteration, timestep = t, imbalance, "imbalance above threshold");
                self.config.strategy.apply(&mut model, &mut diagnostics)?;
                strategy_events += 1;
            }
        }

        let metric = resilience_metric(model.components());
        Ok(IterationOutcome {
            iteration,
            metric,
            strategy_events,
            failed_component_steps,
            diagnostics,
        })
    }
}

/// Write the full report as pretty-printed JSON for downstream tooling.
pub fn write_report_json(path: &Path, report: &SimulationReport) -> GrsResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(report)
        .map_err(|err| GrsError::Parse(err.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_reference_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.n_iterations, 100);
        assert_eq!(config.n_timesteps, 96);
        assert_eq!(config.delta_t, 1.0);
        assert_eq!(config.imbalance_threshold, 0.05);
        assert_eq!(config.metric_mode, MetricMode::Mean);
    }

    #[test]
    fn empty_model_is_rejected() {
        let engine = MonteCarlo::new(EngineConfig::default(), GridModel::new(Vec::new()));
        assert!(matches!(engine.run(), Err(GrsError::Input(_))));
    }

    #[test]
    fn zero_iterations_is_a_config_error() {
        let config = EngineConfig {
            n_iterations: 0,
            ..EngineConfig::default()
        };
        let engine = MonteCarlo::new(config, GridModel::from_parameters(&[(0.1, 1.0)]));
        assert!(matches!(engine.run(), Err(GrsError::Config(_))));
    }
}
