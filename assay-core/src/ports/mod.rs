// assay-core/src/ports/mod.rs

pub mod sink;
pub mod source;

pub use sink::SnapshotSink;
pub use source::RecordSource;
