// assay-core/src/application/report.rs

use std::path::Path;

use crate::domain::entity::Entity;
use crate::domain::quality::QualityReport;
use crate::error::AssayError;
use crate::infrastructure::adapters::FileSnapshotSink;
use crate::infrastructure::config::project::load_project_config;

fn published_sink(project_dir: &Path) -> Result<FileSnapshotSink, AssayError> {
    let config = load_project_config(project_dir)?;
    Ok(FileSnapshotSink::new(project_dir.join(&config.target_path)))
}

/// Metrics of the last published snapshot.
pub fn load_report(project_dir: &Path) -> Result<QualityReport, AssayError> {
    Ok(published_sink(project_dir)?.read_metrics()?)
}

/// First `limit` rows of a published clean or rejected table.
pub fn sample_rows(
    project_dir: &Path,
    entity: Entity,
    rejected: bool,
    limit: usize,
) -> Result<Vec<serde_json::Value>, AssayError> {
    let mut rows = published_sink(project_dir)?.read_table(entity, rejected)?;
    rows.truncate(limit);
    Ok(rows)
}
