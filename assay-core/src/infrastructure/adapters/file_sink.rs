// assay-core/src/infrastructure/adapters/file_sink.rs

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::domain::compliance::RunState;
use crate::domain::entity::Entity;
use crate::domain::quality::{QualityReport, Snapshot};
use crate::error::AssayError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, publish_directory};
use crate::ports::SnapshotSink;

pub const SNAPSHOT_DIR: &str = "snapshot";
pub const STATE_FILE: &str = "state.json";
pub const METRICS_FILE: &str = "metrics.json";

/// Publishes snapshots under `<target>/snapshot/`:
///
/// ```text
/// clean/<table>.json
/// rejected/<table>.json
/// metrics.json
/// ```
///
/// Run bookkeeping goes to `<target>/state.json`, outside the snapshot, so
/// two runs over the same input publish byte-identical snapshot trees.
pub struct FileSnapshotSink {
    target_dir: PathBuf,
}

impl FileSnapshotSink {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        self.target_dir.join(SNAPSHOT_DIR)
    }

    pub fn table_path(&self, entity: Entity, rejected: bool) -> PathBuf {
        let set = if rejected { "rejected" } else { "clean" };
        self.snapshot_dir()
            .join(set)
            .join(format!("{}.json", entity.table()))
    }

    pub fn read_metrics(&self) -> Result<QualityReport, InfrastructureError> {
        let path = self.snapshot_dir().join(METRICS_FILE);
        Ok(serde_json::from_str(&read_published(&path)?)?)
    }

    /// Rows of a published clean or rejected table, as written.
    pub fn read_table(
        &self,
        entity: Entity,
        rejected: bool,
    ) -> Result<Vec<serde_json::Value>, InfrastructureError> {
        let path = self.table_path(entity, rejected);
        Ok(serde_json::from_str(&read_published(&path)?)?)
    }
}

fn read_published(path: &Path) -> Result<String, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::NotPublished(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

#[async_trait]
impl SnapshotSink for FileSnapshotSink {
    async fn previous_state(&self) -> Result<Option<RunState>, AssayError> {
        let path = self.target_dir.join(STATE_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(InfrastructureError::Io)?;
        let state = serde_json::from_str(&content).map_err(InfrastructureError::JsonError)?;
        Ok(Some(state))
    }

    async fn publish(&self, snapshot: &Snapshot, state: &RunState) -> Result<(), AssayError> {
        // Render everything first so a serialization failure leaves disk untouched.
        let mut files = Vec::new();
        for entity in Entity::ALL {
            let clean = snapshot
                .clean_json(entity)
                .map_err(InfrastructureError::JsonError)?;
            let rejected = snapshot
                .rejected_json(entity)
                .map_err(InfrastructureError::JsonError)?;
            files.push((format!("clean/{}.json", entity.table()), clean));
            files.push((format!("rejected/{}.json", entity.table()), rejected));
        }
        let metrics = snapshot
            .metrics_json()
            .map_err(InfrastructureError::JsonError)?;
        files.push((METRICS_FILE.to_string(), metrics));
        let state_json =
            serde_json::to_string_pretty(state).map_err(InfrastructureError::JsonError)?;

        let destination = self.snapshot_dir();
        publish_directory(&destination, |staging| {
            for (rel, content) in &files {
                atomic_write(staging.join(rel), content)?;
            }
            Ok(())
        })?;
        // The snapshot is live from here on; a missing state only leaves the
        // next run's anomaly check without fresh history.
        if let Err(e) = atomic_write(self.target_dir.join(STATE_FILE), state_json) {
            warn!(error = %e, "Snapshot published but run state was not recorded");
        }

        info!(path = ?destination, files = files.len(), "Snapshot published");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::compliance::EntityRunState;
    use anyhow::Result;
    use tempfile::tempdir;

    fn state(clean: u64) -> RunState {
        let mut state = RunState::default();
        state.entities.insert(
            "customers".into(),
            EntityRunState {
                last_run_at: "2024-01-01T00:00:00Z".into(),
                clean_count: clean,
                rejected_count: 0,
            },
        );
        state
    }

    #[tokio::test]
    async fn test_publish_writes_layout_and_state() -> Result<()> {
        let dir = tempdir()?;
        let sink = FileSnapshotSink::new(dir.path());
        assert!(sink.previous_state().await?.is_none());

        sink.publish(&Snapshot::default(), &state(3)).await?;

        for entity in Entity::ALL {
            assert!(sink.table_path(entity, false).exists());
            assert!(sink.table_path(entity, true).exists());
            assert!(sink.read_table(entity, true)?.is_empty());
        }
        assert_eq!(sink.read_metrics()?, QualityReport::default());
        assert_eq!(sink.previous_state().await?, Some(state(3)));
        Ok(())
    }

    #[tokio::test]
    async fn test_state_write_failure_keeps_published_snapshot() -> Result<()> {
        let dir = tempdir()?;
        // A non-empty directory where the state file should go.
        fs::create_dir_all(dir.path().join(STATE_FILE).join("blocked"))?;
        let sink = FileSnapshotSink::new(dir.path());

        sink.publish(&Snapshot::default(), &state(3)).await?;

        for entity in Entity::ALL {
            assert!(sink.table_path(entity, false).exists());
        }
        assert_eq!(sink.read_metrics()?, QualityReport::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_reading_before_publish_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let sink = FileSnapshotSink::new(dir.path());
        assert!(matches!(
            sink.read_metrics(),
            Err(InfrastructureError::NotPublished(_))
        ));
        Ok(())
    }
}
