// assay-core/src/domain/record/staged.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::raw::RawRecord;
use super::value::{RawValue, Value};

/// Taxonomy of per-record failures. These are data, never faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingRequiredField,
    NotNumeric,
    OutOfRange,
    InvalidEnumeration,
    /// Event whose parent transaction is not clean. Pruned, never rejected.
    OrphanedReference,
    /// Fallback when no listed rule explains the failure.
    Unclassified,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequiredField => "missing_required_field",
            Self::NotNumeric => "not_numeric",
            Self::OutOfRange => "out_of_range",
            Self::InvalidEnumeration => "invalid_enumeration",
            Self::OrphanedReference => "orphaned_reference",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A current record with every field in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardizedRecord {
    pub key: Option<String>,
    pub fields: BTreeMap<String, Value>,
    pub ingested_at: Option<NaiveDateTime>,
    /// Source version kept for the reject audit trail.
    pub raw: RawRecord,
}

impl StandardizedRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// A standardized record that passed every rule of its entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanRecord {
    #[serde(skip)]
    pub key: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
    pub ingested_at: Option<NaiveDateTime>,
}

impl CleanRecord {
    pub fn get(&self, field: &str) -> &Value {
        static ABSENT: Value = Value::Absent;
        self.fields.get(field).unwrap_or(&ABSENT)
    }
}

/// A record that failed validation: raw values for audit plus exactly one reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectRecord {
    #[serde(skip)]
    pub key: Option<String>,
    #[serde(flatten)]
    pub raw: BTreeMap<String, RawValue>,
    pub reject_reason: String,
    pub violation_kind: ViolationKind,
}
