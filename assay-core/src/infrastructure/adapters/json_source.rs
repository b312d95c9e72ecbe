// assay-core/src/infrastructure/adapters/json_source.rs

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::entity::Entity;
use crate::domain::error::DomainError;
use crate::domain::record::{RawRecord, undeclared_columns};
use crate::error::AssayError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::RecordSource;

/// Reads `<root>/<table>.json` (an array of objects) or, failing that,
/// `<root>/<table>.jsonl` (one object per line).
pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn locate(&self, entity: Entity) -> Result<(PathBuf, bool), InfrastructureError> {
        let array = self.root.join(format!("{}.json", entity.table()));
        if array.exists() {
            return Ok((array, false));
        }
        let lines = self.root.join(format!("{}.jsonl", entity.table()));
        if lines.exists() {
            return Ok((lines, true));
        }
        Err(InfrastructureError::MissingInput {
            entity: entity.table().to_string(),
            path: array,
        })
    }
}

#[async_trait]
impl RecordSource for JsonDirectorySource {
    async fn load(&self, entity: Entity) -> Result<Vec<RawRecord>, AssayError> {
        let (path, line_delimited) = self.locate(entity)?;
        debug!(entity = %entity, path = ?path, "Reading raw collection");

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(InfrastructureError::Io)?;
        let rows = if line_delimited {
            parse_lines(&content)?
        } else {
            parse_array(entity, &content)?
        };

        records_from_rows(entity, &rows, &path)
    }
}

fn parse_array(entity: Entity, content: &str) -> Result<Vec<serde_json::Value>, AssayError> {
    let document: serde_json::Value =
        serde_json::from_str(content).map_err(InfrastructureError::JsonError)?;
    match document {
        serde_json::Value::Array(rows) => Ok(rows),
        other => Err(DomainError::MalformedCollection {
            entity: entity.table().to_string(),
            reason: format!("expected an array of objects, found {}", json_type(&other)),
        }
        .into()),
    }
}

fn parse_lines(content: &str) -> Result<Vec<serde_json::Value>, AssayError> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line)
                .map_err(|e| AssayError::from(InfrastructureError::JsonError(e)))
        })
        .collect()
}

/// Validates every row against the entity's raw schema. Undeclared columns
/// are tolerated and reported once per collection.
pub(crate) fn records_from_rows(
    entity: Entity,
    rows: &[serde_json::Value],
    origin: &Path,
) -> Result<Vec<RawRecord>, AssayError> {
    let schema = entity.schema();
    let mut ignored = BTreeSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        records.push(RawRecord::from_row(schema, index, row)?);
        ignored.extend(undeclared_columns(schema, row));
    }

    if !ignored.is_empty() {
        warn!(
            entity = %entity,
            origin = ?origin,
            columns = ?ignored,
            "Ignoring undeclared columns"
        );
    }
    Ok(records)
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
