// assay-core/src/domain/record/raw.rs

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

use super::value::RawValue;
use crate::domain::entity::{EntitySchema, INGESTED_AT};
use crate::domain::error::DomainError;
use crate::domain::quality::standardize::transforms::parse_timestamp;

/// One version of a record as ingested. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRecord {
    /// Trimmed natural key; `None` when null or blank.
    pub key: Option<String>,
    /// Every declared column in source representation, `ingested_at` included.
    pub fields: BTreeMap<String, RawValue>,
    pub ingested_at: Option<NaiveDateTime>,
}

impl RawRecord {
    /// Builds a raw record from one row of a collection, enforcing the
    /// documented raw schema. Missing columns read as null, undeclared ones
    /// are ignored.
    pub fn from_row(
        schema: &EntitySchema,
        row_index: usize,
        row: &serde_json::Value,
    ) -> Result<Self, DomainError> {
        let object = row.as_object().ok_or_else(|| DomainError::MalformedCollection {
            entity: schema.entity.table().to_string(),
            reason: format!("row {} is not an object", row_index),
        })?;

        let mismatch = |field: &str, expected: &str| DomainError::SchemaMismatch {
            entity: schema.entity.table().to_string(),
            row: row_index,
            field: field.to_string(),
            expected: expected.to_string(),
        };

        let mut fields = BTreeMap::new();
        for spec in schema.fields {
            let value = match object.get(spec.name) {
                None => RawValue::Null,
                Some(v) => to_raw_value(v).ok_or_else(|| mismatch(spec.name, "a scalar value"))?,
            };
            if spec.name == schema.key_field && matches!(value, RawValue::Bool(_)) {
                return Err(mismatch(spec.name, "a string or number key"));
            }
            fields.insert(spec.name.to_string(), value);
        }

        let ingested_raw = match object.get(INGESTED_AT) {
            None | Some(serde_json::Value::Null) => RawValue::Null,
            Some(serde_json::Value::String(s)) => RawValue::Text(s.clone()),
            Some(_) => return Err(mismatch(INGESTED_AT, "a timestamp string")),
        };
        let ingested_at = match &ingested_raw {
            RawValue::Text(s) => parse_timestamp(s),
            _ => None,
        };
        fields.insert(INGESTED_AT.to_string(), ingested_raw);

        let key = fields
            .get(schema.key_field)
            .and_then(RawValue::as_text)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(Self {
            key,
            fields,
            ingested_at,
        })
    }

    pub fn field(&self, name: &str) -> &RawValue {
        static NULL: RawValue = RawValue::Null;
        self.fields.get(name).unwrap_or(&NULL)
    }

    /// Canonical serialization of the payload (columns sorted by name), used
    /// as the last-resort deterministic tie-break.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(&self.fields).unwrap_or_default()
    }
}

/// Column names present in a row but absent from the schema.
pub fn undeclared_columns(schema: &EntitySchema, row: &serde_json::Value) -> Vec<String> {
    row.as_object()
        .map(|o| {
            o.keys()
                .filter(|k| !schema.declares(k))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

fn to_raw_value(value: &serde_json::Value) -> Option<RawValue> {
    match value {
        serde_json::Value::Null => Some(RawValue::Null),
        serde_json::Value::Bool(b) => Some(RawValue::Bool(*b)),
        serde_json::Value::Number(n) => n.as_f64().map(RawValue::Number),
        serde_json::Value::String(s) => Some(RawValue::Text(s.clone())),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entity::Entity;
    use serde_json::json;

    #[test]
    fn test_from_row_reads_declared_columns() -> anyhow::Result<()> {
        let schema = Entity::Customer.schema();
        let row = json!({
            "customer_id": "  C-001 ",
            "customer_age": 42,
            "ingested_at": "2024-05-01 10:00:00",
            "shoe_size": 44
        });
        let record = RawRecord::from_row(schema, 0, &row)?;

        assert_eq!(record.key.as_deref(), Some("C-001"));
        assert_eq!(record.field("customer_age"), &RawValue::Number(42.0));
        assert_eq!(record.field("customer_country"), &RawValue::Null);
        assert!(!record.fields.contains_key("shoe_size"));
        assert!(record.ingested_at.is_some());
        assert_eq!(undeclared_columns(schema, &row), vec!["shoe_size".to_string()]);
        Ok(())
    }

    #[test]
    fn test_numeric_keys_are_rendered_as_text() -> anyhow::Result<()> {
        let record = RawRecord::from_row(
            Entity::Transaction.schema(),
            0,
            &json!({"transaction_id": 1001}),
        )?;
        assert_eq!(record.key.as_deref(), Some("1001"));
        Ok(())
    }

    #[test]
    fn test_blank_key_is_none() -> anyhow::Result<()> {
        let record =
            RawRecord::from_row(Entity::Merchant.schema(), 0, &json!({"merchant_id": "   "}))?;
        assert!(record.key.is_none());
        Ok(())
    }

    #[test]
    fn test_nested_value_is_a_schema_mismatch() {
        let row = json!({"customer_id": "C1", "customer_age": {"years": 40}});
        let err = RawRecord::from_row(Entity::Customer.schema(), 3, &row).unwrap_err();
        assert!(matches!(
            err,
            DomainError::SchemaMismatch { row: 3, ref field, .. } if field == "customer_age"
        ));
    }

    #[test]
    fn test_boolean_key_and_numeric_ingestion_are_rejected() {
        let schema = Entity::Customer.schema();
        assert!(RawRecord::from_row(schema, 0, &json!({"customer_id": true})).is_err());
        assert!(
            RawRecord::from_row(schema, 0, &json!({"customer_id": "C1", "ingested_at": 17}))
                .is_err()
        );
        assert!(RawRecord::from_row(schema, 0, &json!(["C1"])).is_err());
    }

    #[test]
    fn test_unparsable_ingestion_timestamp_is_null() -> anyhow::Result<()> {
        let record = RawRecord::from_row(
            Entity::Customer.schema(),
            0,
            &json!({"customer_id": "C1", "ingested_at": "yesterday"}),
        )?;
        assert!(record.ingested_at.is_none());
        assert_eq!(record.field("ingested_at"), &RawValue::Text("yesterday".into()));
        Ok(())
    }
}
