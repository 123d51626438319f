//! Diagnostics for non-fatal numeric anomalies observed during a run.
//!
//! The reference model tolerates some out-of-range values (negative sampled
//! generation, ratings driven negative by a shedding strategy). Those
//! conditions are counted here per kind instead of aborting the run, so
//! operators can see how often they occurred.
//!
//! # Example
//!
//! ```
//! use grs_core::diagnostics::{AnomalyKind, Diagnostics};
//!
//! let mut diag = Diagnostics::new();
//! diag.record(AnomalyKind::NegativeGeneration);
//! diag.record(AnomalyKind::NegativeRating);
//! diag.record(AnomalyKind::NegativeRating);
//!
//! assert_eq!(diag.count(AnomalyKind::NegativeRating), 2);
//! assert_eq!(diag.total(), 3);
//! ```

use serde::Serialize;

/// Kind of non-fatal numeric anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Sampled renewable generation went negative.
    NegativeGeneration,
    /// A resilience strategy drove a component rating negative.
    NegativeRating,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::NegativeGeneration => "negative_generation",
            AnomalyKind::NegativeRating => "negative_rating",
        }
    }
}

/// Per-kind counters for numeric anomalies.
///
/// Each Monte Carlo iteration accumulates into its own `Diagnostics`, and
/// the engine merges them into a run-level summary for the final report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    negative_generation: u64,
    negative_rating: u64,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of an anomaly.
    pub fn record(&mut self, kind: AnomalyKind) {
        match kind {
            AnomalyKind::NegativeGeneration => self.negative_generation += 1,
            AnomalyKind::NegativeRating => self.negative_rating += 1,
        }
    }

    /// Number of occurrences of one anomaly kind.
    pub fn count(&self, kind: AnomalyKind) -> u64 {
        match kind {
            AnomalyKind::NegativeGeneration => self.negative_generation,
            AnomalyKind::NegativeRating => self.negative_rating,
        }
    }

    /// Total occurrences across all kinds.
    pub fn total(&self) -> u64 {
        self.negative_generation + self.negative_rating
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: &Diagnostics) {
        self.negative_generation += other.negative_generation;
        self.negative_rating += other.negative_rating;
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "anomalies: negative_generation={}, negative_rating={}",
            self.negative_generation, self.negative_rating
        )
    }
}
