//! Simulation spec files: the external input boundary.
//!
//! An operator supplies per-component `failure_rate` and `rating` plus
//! optional run parameters through a yaml or json file. Nothing upstream
//! validates the numbers, so the loader treats negative or zero failure
//! rates as valid inputs and only rejects structurally malformed specs
//! (missing components, non-finite floats, unknown strategy selectors).

use anyhow::{Context, Result};
use grs_core::{GridModel, GrsError, GrsResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::strategy::ResilienceStrategy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSpec {
    pub version: Option<u32>,
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: ParameterSpec,
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_timesteps")]
    pub timesteps: usize,
    #[serde(default = "default_delta_t")]
    pub delta_t: f64,
    #[serde(default = "default_imbalance_threshold")]
    pub imbalance_threshold: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Worker threads for the iteration fan-out; 0 means all cores.
    #[serde(default)]
    pub threads: usize,
}

fn default_iterations() -> usize {
    100
}

fn default_timesteps() -> usize {
    96
}

fn default_delta_t() -> f64 {
    1.0
}

fn default_imbalance_threshold() -> f64 {
    0.05
}

fn default_seed() -> u64 {
    42
}

fn default_strategy() -> String {
    "demand-response".to_string()
}

impl Default for ParameterSpec {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            timesteps: default_timesteps(),
            delta_t: default_delta_t(),
            imbalance_threshold: default_imbalance_threshold(),
            seed: default_seed(),
            threads: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub failure_rate: f64,
    pub rating: f64,
}

pub fn load_spec_from_path(path: &Path) -> Result<SimulationSpec> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading simulation spec '{}'", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).context("parsing simulation spec yaml")
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).context("parsing simulation spec json")
        }
        _ => serde_yaml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .context("parsing simulation spec"),
    }
}

/// Structural validation of a loaded spec.
pub fn validate(spec: &SimulationSpec) -> GrsResult<()> {
    if spec.components.is_empty() {
        return Err(GrsError::Input(
            "simulation spec must list at least one component".into(),
        ));
    }
    for (index, component) in spec.components.iter().enumerate() {
        if !component.failure_rate.is_finite() {
            return Err(GrsError::Input(format!(
                "component {} has non-finite failure_rate",
                index
            )));
        }
        if !component.rating.is_finite() {
            return Err(GrsError::Input(format!(
                "component {} has non-finite rating",
                index
            )));
        }
    }
    if spec.parameters.iterations == 0 {
        return Err(GrsError::Config("iterations must be >= 1".into()));
    }
    if spec.parameters.timesteps == 0 {
        return Err(GrsError::Config("timesteps must be >= 1".into()));
    }
    if !spec.parameters.delta_t.is_finite() || spec.parameters.delta_t <= 0.0 {
        return Err(GrsError::Config("delta_t must be a positive float".into()));
    }
    if !spec.parameters.imbalance_threshold.is_finite() {
        return Err(GrsError::Config(
            "imbalance_threshold must be a finite float".into(),
        ));
    }
    spec.strategy.parse::<ResilienceStrategy>()?;
    Ok(())
}

impl SimulationSpec {
    /// Build the baseline grid model, assigning component ids in spec
    /// order.
    pub fn build_model(&self) -> GridModel {
        let parameters: Vec<(f64, f64)> = self
            .components
            .iter()
            .map(|component| (component.failure_rate, component.rating))
            .collect();
        GridModel::from_parameters(&parameters)
    }

    pub fn resolve_strategy(&self) -> GrsResult<ResilienceStrategy> {
        self.strategy.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_spec(contents: &str, suffix: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn yaml_spec_round_trips_with_defaults() {
        let file = write_spec(
            r#"
components:
  - failure_rate: 0.01
    rating: 10.0
  - failure_rate: 0.0
    rating: 5.0
strategy: backup
"#,
            ".yaml",
        );
        let spec = load_spec_from_path(file.path()).unwrap();
        assert_eq!(spec.components.len(), 2);
        assert_eq!(spec.parameters.iterations, 100);
        assert_eq!(spec.parameters.timesteps, 96);
        assert_eq!(spec.parameters.imbalance_threshold, 0.05);
        assert_eq!(
            spec.resolve_strategy().unwrap(),
            ResilienceStrategy::Backup
        );
        validate(&spec).unwrap();
    }

    #[test]
    fn json_spec_loads_by_extension() {
        let file = write_spec(
            r#"{"components": [{"failure_rate": 0.5, "rating": 2.0}],
                "parameters": {"iterations": 3, "timesteps": 8}}"#,
            ".json",
        );
        let spec = load_spec_from_path(file.path()).unwrap();
        assert_eq!(spec.parameters.iterations, 3);
        assert_eq!(spec.parameters.timesteps, 8);
        assert_eq!(spec.strategy, "demand-response");
        validate(&spec).unwrap();
    }

    #[test]
    fn empty_component_list_is_an_input_error() {
        let spec = SimulationSpec {
            version: None,
            description: None,
            parameters: ParameterSpec::default(),
            components: Vec::new(),
            strategy: default_strategy(),
        };
        let err = validate(&spec).unwrap_err();
        assert!(matches!(err, GrsError::Input(_)));
    }

    #[test]
    fn non_finite_rating_is_an_input_error() {
        let spec = SimulationSpec {
            version: None,
            description: None,
            parameters: ParameterSpec::default(),
            components: vec![ComponentSpec {
                failure_rate: 0.1,
                rating: f64::NAN,
            }],
            strategy: default_strategy(),
        };
        assert!(matches!(validate(&spec), Err(GrsError::Input(_))));
    }

    #[test]
    fn negative_failure_rate_is_accepted() {
        // No upstream validation: negative and zero rates are valid inputs.
        let spec = SimulationSpec {
            version: None,
            description: None,
            parameters: ParameterSpec::default(),
            components: vec![ComponentSpec {
                failure_rate: -0.3,
                rating: 4.0,
            }],
            strategy: default_strategy(),
        };
        validate(&spec).unwrap();
    }

    #[test]
    fn unknown_strategy_is_a_config_error() {
        let spec = SimulationSpec {
            version: None,
            description: None,
            parameters: ParameterSpec::default(),
            components: vec![ComponentSpec {
                failure_rate: 0.1,
                rating: 4.0,
            }],
            strategy: "islanding".into(),
        };
        assert!(matches!(validate(&spec), Err(GrsError::Config(_))));
    }

    #[test]
    fn build_model_assigns_ids_in_order() {
        let spec = SimulationSpec {
            version: None,
            description: None,
            parameters: ParameterSpec::default(),
            components: vec![
                ComponentSpec {
                    failure_rate: 0.1,
                    rating: 4.0,
                },
                ComponentSpec {
                    failure_rate: 0.2,
                    rating: 6.0,
                },
            ],
            strategy: default_strategy(),
        };
        let model = spec.build_model();
        assert_eq!(model.len(), 2);
        assert_eq!(model.components()[1].id, 1);
        assert_eq!(model.components()[1].failure_rate, 0.2);
    }
}
