//! Unified error types for the GRS ecosystem
//!
//! This module provides a common error type [`GrsError`] that can represent
//! errors from any part of the system. Domain-specific failures are
//! converted to `GrsError` for uniform error handling at API boundaries.
//!
//! # Example
//!
//! ```ignore
//! use grs_core::{GrsError, GrsResult};
//!
//! fn run_simulation(spec_path: &str) -> GrsResult<()> {
//!     let spec = load_spec(spec_path)?;
//!     simulate(&spec)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all GRS operations.
///
/// Only [`GrsError::Input`] and [`GrsError::Config`] abort a run by
/// design; numeric anomalies are tracked through
/// [`crate::Diagnostics`] instead of being raised as errors.
#[derive(Error, Debug)]
pub enum GrsError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Malformed or missing component parameters from the input boundary
    #[error("Input error: {0}")]
    Input(String),

    /// Invalid run configuration (unsupported strategy selector,
    /// zero-divisor strategy application, bad parameter)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using GrsError.
pub type GrsResult<T> = Result<T, GrsError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for GrsError {
    fn from(err: anyhow::Error) -> Self {
        GrsError::Other(err.to_string())
    }
}

// Conversion from string-like types for convenience
impl From<String> for GrsError {
    fn from(s: String) -> Self {
        GrsError::Other(s)
    }
}

impl From<&str> for GrsError {
    fn from(s: &str) -> Self {
        GrsError::Other(s.to_string())
    }
}
