//! Grid component model: per-asset static parameters and dynamic state.

use serde::{Deserialize, Serialize};

/// Operational status of a grid component.
///
/// The base failure state machine only ever transitions
/// `Operational -> Failed`; recovery happens exclusively inside a
/// resilience strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Operational,
    Failed,
}

impl ComponentStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, ComponentStatus::Failed)
    }
}

/// One grid asset.
///
/// `rating` is the capacity/weight of the asset and is mutated only by
/// resilience strategies. `failure_rate` is the constant hazard rate of the
/// discretized exponential failure model; zero and negative values are
/// accepted (such components simply never fail spontaneously).
/// `outage_duration` counts consecutive timesteps spent in the `Failed`
/// state and is reset to zero on recovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridComponent {
    /// Index of the component, fixed at creation.
    pub id: usize,
    /// Capacity rating; mutated only by resilience strategies.
    pub rating: f64,
    /// Exponential hazard rate, constant per run.
    pub failure_rate: f64,
    /// Current operational status.
    pub status: ComponentStatus,
    /// Consecutive timesteps spent failed.
    pub outage_duration: f64,
}

impl GridComponent {
    /// Create a new component in the operational state.
    pub fn new(id: usize, failure_rate: f64, rating: f64) -> Self {
        Self {
            id,
            rating,
            failure_rate,
            status: ComponentStatus::Operational,
            outage_duration: 0.0,
        }
    }

    /// Discretized exponential-hazard failure probability for one timestep:
    /// `P_fail = 1 - exp(-failure_rate * delta_t)`.
    pub fn failure_probability(&self, delta_t: f64) -> f64 {
        1.0 - (-self.failure_rate * delta_t).exp()
    }
}

/// Component state for one simulation run.
///
/// Holds the working component vector mutated by the failure state machine
/// and the resilience strategies, alongside the immutable baseline supplied
/// at construction. [`GridModel::reset`] restores the baseline so every
/// Monte Carlo iteration starts from the externally supplied configuration.
#[derive(Debug, Clone)]
pub struct GridModel {
    baseline: Vec<GridComponent>,
    components: Vec<GridComponent>,
}

impl GridModel {
    pub fn new(components: Vec<GridComponent>) -> Self {
        Self {
            baseline: components.clone(),
            components,
        }
    }

    /// Build a model from `(failure_rate, rating)` pairs, assigning indices
    /// in input order.
    pub fn from_parameters(parameters: &[(f64, f64)]) -> Self {
        let components = parameters
            .iter()
            .enumerate()
            .map(|(id, &(failure_rate, rating))| GridComponent::new(id, failure_rate, rating))
            .collect();
        Self::new(components)
    }

    pub fn components(&self) -> &[GridComponent] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [GridComponent] {
        &mut self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Restore the working state to the baseline configuration.
    pub fn reset(&mut self) {
        self.components.clone_from(&self.baseline);
    }

    /// Precompute per-component failure probabilities for one timestep.
    pub fn failure_probabilities(&self, delta_t: f64) -> Vec<f64> {
        self.components
            .iter()
            .map(|component| component.failure_probability(delta_t))
            .collect()
    }
}

/// Energy-not-served resilience metric: sum over components of
/// `rating * outage_duration`.
pub fn resilience_metric(components: &[GridComponent]) -> f64 {
    components
        .iter()
        .map(|component| component.rating * component.outage_duration)
        .sum()
}
