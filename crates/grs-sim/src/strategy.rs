//! Resilience strategies: corrective policies applied on imbalance events.
//!
//! Exactly one strategy is active per run, selected through configuration
//! rather than re-evaluated per event. All strategies mutate the shared
//! [`GridModel`] in place and log a human-readable action line for
//! operators; the log is observational, never authoritative.

use grs_core::{AnomalyKind, ComponentStatus, Diagnostics, GridModel, GrsError, GrsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Fraction of the standing imbalance absorbed by the backup system.
const BACKUP_IMBALANCE_REDUCTION: f64 = 0.2;
/// Shedding efficiency divisor applied to the per-component imbalance share.
const SHEDDING_EFFICIENCY: f64 = 0.9;

/// Corrective policy dispatched when imbalance exceeds the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResilienceStrategy {
    /// Activate a backup system: recover aged-out outages, then re-fail
    /// eligible units to simulate redistributed backup load.
    Backup,
    /// Shed load by scaling component ratings down.
    LoadShedding,
    /// Shift demand by scaling component ratings up.
    DemandResponse,
}

impl ResilienceStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResilienceStrategy::Backup => "backup",
            ResilienceStrategy::LoadShedding => "load-shedding",
            ResilienceStrategy::DemandResponse => "demand-response",
        }
    }

    /// Apply this strategy to the model, counting numeric anomalies into
    /// `diagnostics`.
    pub fn apply(&self, model: &mut GridModel, diagnostics: &mut Diagnostics) -> GrsResult<()> {
        match self {
            ResilienceStrategy::Backup => apply_backup(model),
            ResilienceStrategy::LoadShedding => apply_load_shedding(model, diagnostics),
            ResilienceStrategy::DemandResponse => apply_demand_response(model, diagnostics),
        }
    }
}

impl fmt::Display for ResilienceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResilienceStrategy {
    type Err = GrsError;

    fn from_str(s: &str) -> GrsResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backup" => Ok(ResilienceStrategy::Backup),
            "load-shedding" | "load_shedding" => Ok(ResilienceStrategy::LoadShedding),
            "demand-response" | "demand_response" => Ok(ResilienceStrategy::DemandResponse),
            other => Err(GrsError::Config(format!(
                "unsupported resilience strategy '{}'; expected backup, load-shedding or demand-response",
                other
            ))),
        }
    }
}

/// Sum of `rating * failure_rate` over currently failed components.
fn failed_capacity_imbalance(model: &GridModel) -> f64 {
    model
        .components()
        .iter()
        .filter(|component| component.status.is_failed())
        .map(|component| component.rating * component.failure_rate)
        .sum()
}

/// Shedding strategies divide by `failure_rate * 0.1`; a failed component
/// with exactly zero failure rate would make that divisor vanish. The
/// state machine never produces such a component, so reaching this guard
/// means the model was configured inconsistently.
fn guard_zero_rate_failures(model: &GridModel) -> GrsResult<()> {
    for component in model.components() {
        if component.status.is_failed() && component.failure_rate == 0.0 {
            return Err(GrsError::Config(format!(
                "component {} is failed with zero failure rate; strategy scaling would divide by zero",
                component.id
            )));
        }
    }
    Ok(())
}

fn record_negative_rating(id: usize, rating: f64, diagnostics: &mut Diagnostics) {
    if rating < 0.0 {
        if diagnostics.count(AnomalyKind::NegativeRating) == 0 {
            warn!(component = id, rating, "strategy drove component rating negative");
        }
        diagnostics.record(AnomalyKind::NegativeRating);
    }
}

/// Backup system activation.
///
/// Phase one recovers components whose outage has aged out: every positive
/// outage duration is decremented, and a duration reaching exactly zero
/// flips the component back to operational. Phase two re-fails eligible
/// components until the reduced imbalance is absorbed.
fn apply_backup(model: &mut GridModel) -> GrsResult<()> {
    info!("activating backup system (reducing imbalance)");

    for component in model.components_mut() {
        if component.outage_duration > 0.0 {
            component.outage_duration -= 1.0;
            if component.outage_duration == 0.0 {
                component.status = ComponentStatus::Operational;
            }
        }
    }

    // Legacy behavior carried over from the original model: both sums are
    // taken over the same post-recovery state, so `imbalance_after` starts
    // equal to `imbalance_before` and the comparison only diverges through
    // the reduction below.
    let imbalance_before = failed_capacity_imbalance(model);
    let mut imbalance_after = failed_capacity_imbalance(model);
    imbalance_after -= imbalance_before * BACKUP_IMBALANCE_REDUCTION;

    for component in model.components_mut() {
        if component.failure_rate > 0.0 && imbalance_after > 0.0 {
            component.outage_duration += 1.0;
            component.status = ComponentStatus::Failed;
            imbalance_after -= component.rating * component.failure_rate;
        }
    }
    Ok(())
}

/// Load shedding: reduce demand to match remaining supply by scaling
/// eligible component ratings down. Ratings are deliberately unclamped;
/// a negative result is counted as a numeric anomaly.
fn apply_load_shedding(model: &mut GridModel, diagnostics: &mut Diagnostics) -> GrsResult<()> {
    info!("implementing load shedding (matching supply and demand)");

    let imbalance = failed_capacity_imbalance(model);
    if imbalance <= 0.0 {
        return Ok(());
    }
    guard_zero_rate_failures(model)?;

    let demand_reduction = imbalance / (model.len() as f64 * SHEDDING_EFFICIENCY);
    for component in model.components_mut() {
        if component.failure_rate > 0.0 {
            component.rating *= 1.0 - demand_reduction / (component.failure_rate * 0.1);
            record_negative_rating(component.id, component.rating, diagnostics);
        }
    }
    Ok(())
}

/// Demand response: shift demand to match supply by scaling eligible
/// component ratings up. Mirrors load shedding with the opposite sign.
fn apply_demand_response(model: &mut GridModel, diagnostics: &mut Diagnostics) -> GrsResult<()> {
    info!("implementing demand response (shifting demand to match supply)");

    let imbalance = failed_capacity_imbalance(model);
    if imbalance <= 0.0 {
        return Ok(());
    }
    guard_zero_rate_failures(model)?;

    let demand_shift = imbalance / (model.len() as f64 * SHEDDING_EFFICIENCY);
    for component in model.components_mut() {
        if component.failure_rate > 0.0 {
            component.rating *= 1.0 + demand_shift / (component.failure_rate * 0.1);
            record_negative_rating(component.id, component.rating, diagnostics);
        }
    }
    Ok(())
}
