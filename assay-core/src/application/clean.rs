// assay-core/src/application/clean.rs

use crate::error::AssayError;
use crate::infrastructure::config::project::load_project_config;
use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// What `clean_project` removed, per configured target.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CleanReport {
    pub removed: Vec<(String, usize)>,
}

pub fn clean_project(project_dir: &Path) -> Result<CleanReport, AssayError> {
    tracing::info!("🧹 Initializing Assay cleanup sequence...");

    let config = load_project_config(project_dir)?;

    let targets = if config.clean_targets.is_empty() {
        vec![config.target_path.clone()]
    } else {
        config.clean_targets
    };

    let mut report = CleanReport::default();
    for target_rel_path in targets {
        // Zero-Trust Path Traversal Guard
        if !is_contained(&target_rel_path) {
            return Err(AssayError::UnsafePath(target_rel_path));
        }
        let full_path = project_dir.join(&target_rel_path);

        if full_path.exists() {
            let files = WalkDir::new(&full_path)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .count();

            if full_path.is_dir() {
                fs::remove_dir_all(&full_path).map_err(InfrastructureError::Io)?;
            } else {
                fs::remove_file(&full_path).map_err(InfrastructureError::Io)?;
            }
            tracing::info!(target = %target_rel_path, files, "Artifact removed");
            report.removed.push((target_rel_path, files));
        }
    }

    Ok(report)
}

/// Relative, non-empty, and never climbing out of the project.
fn is_contained(rel: &str) -> bool {
    let path = Path::new(rel);
    !rel.trim().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
