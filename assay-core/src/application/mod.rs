// assay-core/src/application/mod.rs

pub mod clean;
pub mod pipeline;
pub mod report;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use assay_core::application::{run_pipeline, clean_project, load_report};`

pub use clean::{CleanReport, clean_project};
pub use pipeline::{RunResult, run_pipeline};
pub use report::{load_report, sample_rows};
