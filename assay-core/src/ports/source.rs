// assay-core/src/ports/source.rs

// What the pipeline needs from upstream: one immutable raw batch per entity.
// Whether it comes from files, memory or a warehouse is the adapter's concern.

use crate::domain::entity::Entity;
use crate::domain::record::RawRecord;
use crate::error::AssayError;
use async_trait::async_trait;

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Every raw row of `entity`, duplicates included, in source order.
    ///
    /// A missing or malformed collection is an error, never an empty batch.
    async fn load(&self, entity: Entity) -> Result<Vec<RawRecord>, AssayError>;
}
