// assay-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Schema mismatch in '{entity}' row {row}: field '{field}' expected {expected}")]
    #[diagnostic(
        code(assay::domain::schema_mismatch),
        help("Raw fields accept strings, numbers, booleans or null. Fix the upstream batch before re-running.")
    )]
    SchemaMismatch {
        entity: String,
        row: usize,
        field: String,
        expected: String,
    },

    #[error("Malformed collection '{entity}': {reason}")]
    #[diagnostic(
        code(assay::domain::malformed_collection),
        help("A raw collection must be a list of objects.")
    )]
    MalformedCollection { entity: String, reason: String },

    #[error("Compliance Check Failed: {0}")]
    #[diagnostic(code(assay::domain::compliance))]
    ComplianceError(String),

    #[error("Invalid pipeline definition for '{entity}': {reason}")]
    #[diagnostic(
        code(assay::domain::definition),
        help("Check enumeration overrides and rule names.")
    )]
    InvalidDefinition { entity: String, reason: String },
}
