// assay-core/src/infrastructure/adapters/memory.rs

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use super::json_source::records_from_rows;
use crate::domain::compliance::RunState;
use crate::domain::entity::Entity;
use crate::domain::quality::Snapshot;
use crate::domain::record::RawRecord;
use crate::error::AssayError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::{RecordSource, SnapshotSink};

/// Raw rows held in memory. Rows go through the same schema checks as the
/// file source.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    rows: BTreeMap<Entity, Vec<serde_json::Value>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, entity: Entity, rows: Vec<serde_json::Value>) -> Self {
        self.rows.insert(entity, rows);
        self
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn load(&self, entity: Entity) -> Result<Vec<RawRecord>, AssayError> {
        let rows = self
            .rows
            .get(&entity)
            .ok_or_else(|| InfrastructureError::MissingInput {
                entity: entity.table().to_string(),
                path: PathBuf::from("<memory>"),
            })?;
        records_from_rows(entity, rows, &PathBuf::from("<memory>"))
    }
}

#[derive(Debug, Default)]
pub struct InMemorySink {
    state: Mutex<Option<RunState>>,
    published: Mutex<Vec<Snapshot>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: RunState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            published: Mutex::new(Vec::new()),
        }
    }

    /// Every snapshot published so far, oldest first.
    pub fn published(&self) -> Result<Vec<Snapshot>, AssayError> {
        Ok(self.published.lock().map_err(poisoned)?.clone())
    }

    pub fn latest(&self) -> Result<Option<Snapshot>, AssayError> {
        Ok(self.published.lock().map_err(poisoned)?.last().cloned())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> AssayError {
    AssayError::InternalError("in-memory sink lock poisoned".to_string())
}

#[async_trait]
impl SnapshotSink for InMemorySink {
    async fn previous_state(&self) -> Result<Option<RunState>, AssayError> {
        Ok(self.state.lock().map_err(poisoned)?.clone())
    }

    async fn publish(&self, snapshot: &Snapshot, state: &RunState) -> Result<(), AssayError> {
        self.published
            .lock()
            .map_err(poisoned)?
            .push(snapshot.clone());
        *self.state.lock().map_err(poisoned)? = Some(state.clone());
        Ok(())
    }
}
