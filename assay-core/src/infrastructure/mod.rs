// assay-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod error;
pub mod fs;

pub use adapters::{FileSnapshotSink, InMemorySink, InMemorySource, JsonDirectorySource};
pub use config::{ProjectConfig, load_project_config};
