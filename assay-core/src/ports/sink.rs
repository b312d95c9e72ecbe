// assay-core/src/ports/sink.rs

use crate::domain::compliance::RunState;
use crate::domain::quality::Snapshot;
use crate::error::AssayError;
use async_trait::async_trait;

#[async_trait]
pub trait SnapshotSink: Send + Sync {
    /// Bookkeeping of the last successful run, if any.
    async fn previous_state(&self) -> Result<Option<RunState>, AssayError>;

    /// Replaces the published snapshot as a whole. On error the previous
    /// snapshot must still be readable.
    async fn publish(&self, snapshot: &Snapshot, state: &RunState) -> Result<(), AssayError>;
}
