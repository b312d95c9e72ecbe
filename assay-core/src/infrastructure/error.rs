// assay-core/src/infrastructure/error.rs

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(assay::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(assay::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    // --- RAW BATCHES / SNAPSHOTS ---
    #[error("JSON Error: {0}")]
    #[diagnostic(
        code(assay::infra::json),
        help("Raw collections must be a JSON array of objects, or one object per line (.jsonl).")
    )]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(assay::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(assay::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Raw collection '{entity}' not found (looked for {path:?})")]
    #[diagnostic(
        code(assay::infra::missing_input),
        help("Every entity needs a <table>.json or <table>.jsonl file in the input directory.")
    )]
    MissingInput { entity: String, path: PathBuf },

    #[error("No published snapshot at {0:?}")]
    #[diagnostic(
        code(assay::infra::not_published),
        help("Run `assay run` first.")
    )]
    NotPublished(PathBuf),
}
