// assay-core/src/domain/quality/dedup.rs

use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::entity::EntitySchema;
use crate::domain::quality::standardize::transforms::parse_timestamp;
use crate::domain::record::RawRecord;

/// Selects the current version of every natural key.
///
/// This is a window ranking over an immutable snapshot: records are grouped
/// by key, each group is sorted by the entity's ordering and rank 1 wins.
/// Arrival order never matters.
pub struct Deduplicator<'a> {
    schema: &'a EntitySchema,
}

/// Sort key of one raw version. Greater means "more current".
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Recency {
    // `None < Some(_)`, so nulls rank last when sorting descending.
    occurred_at: Option<NaiveDateTime>,
    ingested_at: Option<NaiveDateTime>,
}

impl<'a> Deduplicator<'a> {
    pub fn new(schema: &'a EntitySchema) -> Self {
        Self { schema }
    }

    /// Returns one record per distinct key, ordered by key (null key first).
    pub fn current_versions(&self, records: &[RawRecord]) -> Vec<RawRecord> {
        let mut groups: BTreeMap<Option<&str>, Vec<&RawRecord>> = BTreeMap::new();
        for record in records {
            groups.entry(record.key.as_deref()).or_default().push(record);
        }

        groups
            .into_values()
            .filter_map(|mut versions| {
                versions.sort_by(|a, b| self.rank(a, b));
                versions.first().map(|r| (*r).clone())
            })
            .collect()
    }

    /// Ordering inside one key group: most recent first, then the smallest
    /// payload fingerprint.
    fn rank(&self, a: &RawRecord, b: &RawRecord) -> Ordering {
        self.recency(b)
            .cmp(&self.recency(a))
            .then_with(|| a.fingerprint().cmp(&b.fingerprint()))
    }

    fn recency(&self, record: &RawRecord) -> Recency {
        let occurred_at = self.schema.occurrence_field.and_then(|field| {
            record
                .field(field)
                .as_text()
                .and_then(|text| parse_timestamp(&text))
        });
        Recency {
            occurred_at,
            ingested_at: record.ingested_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entity::Entity;
    use crate::domain::record::RawValue;
    use serde_json::json;

    fn raw(entity: Entity, row: serde_json::Value) -> RawRecord {
        RawRecord::from_row(entity.schema(), 0, &row).unwrap()
    }

    #[test]
    fn test_latest_ingestion_wins() {
        let rows = vec![
            raw(
                Entity::Customer,
                json!({"customer_id": "C1", "customer_age": 30, "ingested_at": "2024-01-02 00:00:00"}),
            ),
            raw(
                Entity::Customer,
                json!({"customer_id": "C1", "customer_age": 31, "ingested_at": "2024-01-01 00:00:00"}),
            ),
        ];
        let current = Deduplicator::new(Entity::Customer.schema()).current_versions(&rows);
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].field("customer_age"), &RawValue::Number(30.0));
    }

    #[test]
    fn test_null_ingestion_ranks_last() {
        let rows = vec![
            raw(Entity::Merchant, json!({"merchant_id": "M1", "risk_level": "HIGH"})),
            raw(
                Entity::Merchant,
                json!({"merchant_id": "M1", "risk_level": "LOW", "ingested_at": "2020-01-01"}),
            ),
        ];
        let current = Deduplicator::new(Entity::Merchant.schema()).current_versions(&rows);
        assert_eq!(current[0].field("risk_level"), &RawValue::Text("LOW".into()));
    }

    #[test]
    fn test_events_rank_on_occurrence_before_ingestion() {
        let rows = vec![
            raw(
                Entity::Event,
                json!({"log_id": "L1", "event_type": "late_ingest",
                       "event_timestamp": "2024-01-01 10:00:00", "ingested_at": "2024-02-01 00:00:00"}),
            ),
            raw(
                Entity::Event,
                json!({"log_id": "L1", "event_type": "latest_event",
                       "event_timestamp": "2024-01-01 11:00:00", "ingested_at": "2024-01-05 00:00:00"}),
            ),
        ];
        let current = Deduplicator::new(Entity::Event.schema()).current_versions(&rows);
        assert_eq!(
            current[0].field("event_type"),
            &RawValue::Text("latest_event".into())
        );
    }

    #[test]
    fn test_ties_are_broken_by_payload_regardless_of_arrival_order() {
        let a = raw(
            Entity::Customer,
            json!({"customer_id": "C1", "customer_name": "alice", "ingested_at": "2024-01-01"}),
        );
        let b = raw(
            Entity::Customer,
            json!({"customer_id": "C1", "customer_name": "bob", "ingested_at": "2024-01-01"}),
        );
        let dedup = Deduplicator::new(Entity::Customer.schema());

        let forward = dedup.current_versions(&[a.clone(), b.clone()]);
        let backward = dedup.current_versions(&[b, a]);
        assert_eq!(forward, backward);
        assert_eq!(
            forward[0].field("customer_name"),
            &RawValue::Text("alice".into())
        );
    }

    #[test]
    fn test_one_version_per_key_sorted_with_null_key_first() {
        let rows = vec![
            raw(Entity::Customer, json!({"customer_id": "C2"})),
            raw(Entity::Customer, json!({"customer_id": null, "customer_age": 1})),
            raw(Entity::Customer, json!({"customer_id": "C1"})),
            raw(Entity::Customer, json!({"customer_id": " ", "customer_age": 2})),
            raw(Entity::Customer, json!({"customer_id": "C1 "})),
        ];
        let current = Deduplicator::new(Entity::Customer.schema()).current_versions(&rows);
        let keys: Vec<Option<&str>> = current.iter().map(|r| r.key.as_deref()).collect();
        assert_eq!(keys, vec![None, Some("C1"), Some("C2")]);
    }
}
