// assay-core/src/infrastructure/config/project.rs

use serde::{Deserialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::project::configuration::ProjectConfig;
use crate::domain::quality::EnumerationDomain;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["assay_project_conf.yaml", "assay.yaml"];

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project manifest");

    let mut config: ProjectConfig = load_fragment(&config_path)?;

    // Satellites are fail-secure: a corrupt fragment stops the load.
    for config_folder in &config.config_paths.clone() {
        let config_dir = project_dir.join(config_folder);
        if config_dir.exists() {
            load_satellite_configs(&mut config, &config_dir)?;
        } else {
            warn!(path = ?config_dir, "Configuration folder not found, skipping");
        }
    }

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(format!("{:?}: {}", config_path, e)))?;
    for (name, domain) in &config.enumerations {
        domain.validate().map_err(|e| {
            InfrastructureError::ConfigError(format!("enumeration '{}': {}", name, e))
        })?;
    }

    Ok(config)
}

pub fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

/// Loads a typed configuration fragment. `T` is the wrapper expected in the file.
fn load_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path).map_err(|e| {
        InfrastructureError::ConfigError(format!("Failed to read {:?}: {}", path, e))
    })?;
    serde_yaml::from_str(&content).map_err(|e| {
        InfrastructureError::ConfigError(format!("Failed to parse YAML at {:?}: {}", path, e))
    })
}

fn load_satellite_configs(
    config: &mut ProjectConfig,
    config_dir: &Path,
) -> Result<(), InfrastructureError> {
    let enum_path = config_dir.join("enumerations.yml");
    if enum_path.exists() {
        #[derive(Deserialize)]
        struct EnumerationsWrapper {
            #[serde(default)]
            enumerations: BTreeMap<String, EnumerationDomain>,
        }

        let wrapper: EnumerationsWrapper = load_fragment(&enum_path)?;
        info!(
            count = wrapper.enumerations.len(),
            "  🔤 Enumeration overrides loaded"
        );
        config.enumerations.extend(wrapper.enumerations);
    }

    Ok(())
}

fn apply_env_overrides(config: &mut ProjectConfig) {
    if let Ok(val) = std::env::var("ASSAY_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Ok(val) = std::env::var("ASSAY_INPUT_PATH") {
        info!(old = ?config.input_path, new = ?val, "Overriding input path via ENV");
        config.input_path = val;
    }
    if let Ok(val) = std::env::var("ASSAY_STRICT") {
        match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => config.governance.strict = true,
            "0" | "false" | "no" => config.governance.strict = false,
            other => warn!(value = other, "Ignoring unrecognized ASSAY_STRICT value"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::quality::FallbackPolicy;
    use anyhow::Result;
    use tempfile::tempdir;

    fn write(dir: &Path, rel: &str, content: &str) -> Result<()> {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(path, content)?;
        Ok(())
    }

    #[test]
    fn test_missing_config_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let err = load_project_config(dir.path()).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigNotFound(_)));
        Ok(())
    }

    #[test]
    fn test_loads_main_file_and_enumeration_satellite() -> Result<()> {
        let dir = tempdir()?;
        write(
            dir.path(),
            "assay.yaml",
            "name: upay\nversion: '1.0'\nconfig-paths: [config]\ngovernance:\n  strict: true\n",
        )?;
        write(
            dir.path(),
            "config/enumerations.yml",
            r#"
enumerations:
  merchant.processing_tier:
    canonical: [STANDARD, PREMIUM, ENTERPRISE]
    synonyms:
      GOLD: PREMIUM
    fallback:
      policy: default
      value: STANDARD
"#,
        )?;

        let config = load_project_config(dir.path())?;
        assert_eq!(config.name, "upay");
        assert!(config.governance.strict);
        let tier = &config.enumerations["merchant.processing_tier"];
        assert_eq!(tier.synonyms["GOLD"], "PREMIUM");
        assert_eq!(
            tier.fallback,
            FallbackPolicy::Default {
                value: "STANDARD".into()
            }
        );
        Ok(())
    }

    #[test]
    fn test_corrupt_satellite_stops_loading() -> Result<()> {
        let dir = tempdir()?;
        write(
            dir.path(),
            "assay.yaml",
            "name: upay\nversion: '1.0'\nconfig-paths: [config]\n",
        )?;
        write(dir.path(), "config/enumerations.yml", "enumerations: [oops\n")?;
        assert!(load_project_config(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_empty_canonical_set_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        write(
            dir.path(),
            "assay_project_conf.yaml",
            "name: upay\nversion: '1.0'\nconfig-paths: [config]\n",
        )?;
        write(
            dir.path(),
            "config/enumerations.yml",
            "enumerations:\n  transaction.currency:\n    canonical: []\n",
        )?;
        let err = load_project_config(dir.path()).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigError(_)));
        Ok(())
    }
}
