// assay-core/src/domain/compliance/mod.rs

pub mod anomaly;
pub use anomaly::{AnomalyError, EntityRunState, RowCountCheck, RunState};
