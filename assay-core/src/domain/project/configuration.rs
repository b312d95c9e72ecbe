// src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::domain::quality::EnumerationDomain;

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,
    pub version: String,

    #[serde(rename = "input-path", default = "default_input_path")]
    pub input_path: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(rename = "clean-targets", default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    #[serde(rename = "config-paths", default)]
    pub config_paths: Vec<String>,

    #[validate(nested)]
    #[serde(default)]
    pub governance: GovernanceConfig,

    /// Overrides of the built-in enumeration domains, loaded from the
    /// `enumerations.yml` satellite files.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub enumerations: BTreeMap<String, EnumerationDomain>,
}

impl ProjectConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "1.0".to_string(),
            input_path: default_input_path(),
            target_path: default_target_path(),
            clean_targets: default_clean_targets(),
            config_paths: Vec::new(),
            governance: GovernanceConfig::default(),
            enumerations: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct GovernanceConfig {
    /// Opt-in gate: fail the run (nothing published) when the anomaly check
    /// trips. Off by default, so rejected records never abort a run.
    #[serde(default)]
    pub strict: bool,

    /// Tolerated relative deviation of clean counts between runs.
    #[validate(range(min = 0.0, message = "Threshold must be non-negative"))]
    #[serde(default = "default_row_count_threshold")]
    pub row_count_threshold: f64,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            strict: false,
            row_count_threshold: default_row_count_threshold(),
        }
    }
}

fn default_row_count_threshold() -> f64 {
    0.5
}
fn default_clean_targets() -> Vec<String> {
    vec!["target".to_string()]
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_input_path() -> String {
    "data/raw".to_string()
}
