// assay-core/src/infrastructure/adapters/mod.rs

pub mod file_sink;
pub mod json_source;
pub mod memory;

pub use file_sink::FileSnapshotSink;
pub use json_source::JsonDirectorySource;
pub use memory::{InMemorySink, InMemorySource};
