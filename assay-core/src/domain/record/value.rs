// assay-core/src/domain/record/value.rs

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;

/// A field as the upstream producer delivered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Textual rendering used by text transforms and key extraction.
    /// Integral numbers render without a fractional part (`42.0` -> `"42"`).
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(Cow::Owned(b.to_string())),
            Self::Number(n) => Some(Cow::Owned(render_number(*n))),
            Self::Text(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }
}

fn render_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A field in canonical form.
///
/// `Absent` means the source had nothing usable; `NotANumber` keeps the raw
/// text of a value that was supposed to be numeric but did not parse.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Absent,
    Text(String),
    Number(f64),
    NotANumber(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            Self::Date(d) => d.and_hms_opt(0, 0, 0),
            _ => None,
        }
    }
}

/// Marker written for numeric fields that failed to parse.
pub const NOT_A_NUMBER: &str = "NaN";

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::NotANumber(_) => serializer.serialize_str(NOT_A_NUMBER),
            Self::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            Self::Timestamp(ts) => {
                serializer.serialize_str(&ts.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
        }
    }
}
