// assay-core/src/domain/quality/standardize/transforms.rs
//
// Field-level canonical transforms. None of them can fail: a value that
// cannot be coerced becomes `Absent` or `NotANumber`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::domain::record::{RawValue, Value};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Compiled patterns shared by the text transforms.
#[derive(Debug, Clone)]
pub struct TextPatterns {
    whitespace: Regex,
    non_letters: Regex,
}

impl TextPatterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            whitespace: Regex::new(r"\s+")?,
            // ASCII letters only, like REGEXP_REPLACE(code, '[^A-Za-z]', '').
            non_letters: Regex::new(r"[^A-Za-z]+")?,
        })
    }

    /// Trim, uppercase and collapse internal whitespace runs to one space.
    pub fn free_text(&self, raw: &RawValue) -> Value {
        match non_empty(raw) {
            Some(text) => Value::Text(
                self.whitespace
                    .replace_all(text.trim(), " ")
                    .to_uppercase(),
            ),
            None => Value::Absent,
        }
    }

    /// Drop every non-letter, then uppercase. Empty result is `None`.
    pub fn letters_only(&self, raw: &RawValue) -> Option<String> {
        let text = raw.as_text()?;
        let letters = self.non_letters.replace_all(&text, "").to_uppercase();
        (!letters.is_empty()).then_some(letters)
    }
}

fn non_empty(raw: &RawValue) -> Option<String> {
    raw.as_text()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Trim, keep case.
pub fn identifier(raw: &RawValue) -> Value {
    non_empty(raw).map(Value::Text).unwrap_or(Value::Absent)
}

/// Trim and uppercase.
pub fn categorical(raw: &RawValue) -> Value {
    non_empty(raw)
        .map(|t| Value::Text(t.to_uppercase()))
        .unwrap_or(Value::Absent)
}

/// Trimmed, uppercased text used as enumeration input.
pub fn enumeration_input(raw: &RawValue) -> Option<String> {
    non_empty(raw).map(|t| t.to_uppercase())
}

pub fn numeric(raw: &RawValue) -> Value {
    match raw {
        RawValue::Null => Value::Absent,
        RawValue::Number(n) if n.is_finite() => Value::Number(*n),
        RawValue::Number(n) => Value::NotANumber(n.to_string()),
        RawValue::Bool(b) => Value::NotANumber(b.to_string()),
        RawValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Value::Absent;
            }
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Value::Number(n),
                _ => Value::NotANumber(trimmed.to_string()),
            }
        }
    }
}

pub fn date(raw: &RawValue) -> Value {
    raw.as_text()
        .and_then(|t| parse_date(&t))
        .map(Value::Date)
        .unwrap_or(Value::Absent)
}

pub fn timestamp(raw: &RawValue) -> Value {
    raw.as_text()
        .and_then(|t| parse_timestamp(&t))
        .map(Value::Timestamp)
        .unwrap_or(Value::Absent)
}

/// Best-effort timestamp parse. Date-only input is midnight.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| parse_calendar_date(text).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Best-effort date parse. Timestamps are truncated to their date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    parse_calendar_date(text).or_else(|| parse_timestamp(text).map(|ts| ts.date()))
}

fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}
