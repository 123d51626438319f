//! # grs-core: Grid Reliability Simulation Core
//!
//! Provides the fundamental data structures for Monte Carlo reliability
//! simulation of a small electrical grid.
//!
//! ## Design Philosophy
//!
//! A grid is modeled as a flat list of [`GridComponent`] assets, each with a
//! capacity rating and an exponential-hazard failure rate. The
//! [`GridModel`] owns both the working component state mutated during a
//! simulation iteration and the immutable baseline it is reset to at the
//! start of every iteration, so iterations stay statistically independent
//! trials.
//!
//! ## Quick Start
//!
//! ```rust
//! use grs_core::{resilience_metric, GridComponent, GridModel};
//!
//! let model = GridModel::new(vec![
//!     GridComponent::new(0, 0.01, 10.0),
//!     GridComponent::new(1, 0.02, 8.0),
//! ]);
//!
//! // All components start operational, so no energy is unserved.
//! assert_eq!(resilience_metric(model.components()), 0.0);
//! ```
//!
//! ## Core Data Structures
//!
//! - [`GridModel`] - working component state plus reset baseline
//! - [`GridComponent`] - one grid asset (rating, failure rate, status)
//! - [`ComponentStatus`] - two-state operational/failed status
//! - [`Diagnostics`] - non-fatal numeric anomaly counters
//! - [`GrsError`] / [`GrsResult`] - unified error handling

pub mod component;
pub mod diagnostics;
pub mod error;

pub use component::{
    resilience_metric, ComponentStatus, GridComponent, GridModel,
};
pub use diagnostics::{AnomalyKind, Diagnostics};
pub use error::{GrsError, GrsResult};
