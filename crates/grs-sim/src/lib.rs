//! Monte Carlo reliability simulation engine for small electrical grids.
//!
//! A fixed set of [`grs_core::GridComponent`] assets probabilistically fail
//! over discrete time while stochastic demand and renewable-generation
//! signals are sampled. Whenever instantaneous imbalance (demand minus
//! generation) exceeds a threshold, the configured
//! [`strategy::ResilienceStrategy`] corrects the component state. The
//! engine aggregates an energy-not-served resilience metric across many
//! independent iterations.

pub mod engine;
pub mod failure;
pub mod sampler;
pub mod spec;
pub mod strategy;

pub use engine::{
    write_report_json, EngineConfig, IterationOutcome, MetricMode, MonteCarlo, SimulationReport,
};
pub use sampler::{sample_demand, sample_renewable_generation};
pub use spec::{load_spec_from_path, ComponentSpec, ParameterSpec, SimulationSpec};
pub use strategy::ResilienceStrategy;
