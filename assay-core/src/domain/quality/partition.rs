// assay-core/src/domain/quality/partition.rs

use std::collections::BTreeMap;

use super::rules::{RuleSet, UNCLASSIFIED_REASON};
use crate::domain::record::{CleanRecord, RejectRecord, StandardizedRecord, ViolationKind};

/// Disjoint, exhaustive split of one entity's standardized records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub clean: Vec<CleanRecord>,
    pub rejected: Vec<RejectRecord>,
    /// Per rule, how many records fail it (priority ignored).
    pub violations: BTreeMap<String, u64>,
}

pub struct Partitioner<'a> {
    rules: &'a RuleSet,
}

impl<'a> Partitioner<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Every input record lands in exactly one of `clean` / `rejected`;
    /// input order is preserved in both.
    pub fn partition(&self, records: Vec<StandardizedRecord>) -> Partition {
        let mut partition = Partition {
            violations: self
                .rules
                .rules()
                .iter()
                .map(|r| (r.name.to_string(), 0))
                .collect(),
            ..Partition::default()
        };

        for record in records {
            for rule in self.rules.failing_rules(&record) {
                *partition.violations.entry(rule.to_string()).or_insert(0) += 1;
            }

            match (self.rules.first_violation(&record), record.key.clone()) {
                (None, Some(key)) => partition.clean.push(CleanRecord {
                    key,
                    fields: record.fields,
                    ingested_at: record.ingested_at,
                }),
                (Some(violation), key) => partition.rejected.push(RejectRecord {
                    key,
                    raw: record.raw.fields,
                    reject_reason: violation.reason.to_string(),
                    violation_kind: violation.kind,
                }),
                // Passed every rule without a natural key: only possible with
                // a rule set that does not check the key.
                (None, None) => partition.rejected.push(RejectRecord {
                    key: None,
                    raw: record.raw.fields,
                    reject_reason: UNCLASSIFIED_REASON.to_string(),
                    violation_kind: ViolationKind::Unclassified,
                }),
            }
        }

        partition
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entity::Entity;
    use crate::domain::quality::rules::RuleSet;
    use crate::domain::quality::standardize::{EnumerationCatalog, Standardizer};
    use crate::domain::record::RawRecord;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn rules_for(entity: Entity) -> RuleSet {
        crate::domain::quality::rules::rules_for(entity, &EnumerationCatalog::default()).unwrap()
    }

    fn customers(rows: Vec<serde_json::Value>) -> Vec<StandardizedRecord> {
        let standardizer =
            Standardizer::new(Entity::Customer, &EnumerationCatalog::default()).unwrap();
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                standardizer
                    .standardize(RawRecord::from_row(Entity::Customer.schema(), i, row).unwrap())
            })
            .collect()
    }

    fn sample() -> Vec<StandardizedRecord> {
        customers(vec![
            json!({"customer_id": "C1", "customer_country": "AU", "customer_age": 40, "risk_score": 700}),
            json!({"customer_id": "C2", "customer_country": "AU", "customer_age": 15, "risk_score": 700}),
            json!({"customer_id": "C3", "customer_age": 15, "risk_score": 9000}),
            json!({"customer_id": null, "customer_country": "NZ", "customer_age": 30, "risk_score": 300}),
            json!({"customer_id": "C5", "customer_country": "US", "customer_age": 99, "risk_score": 101}),
        ])
    }

    #[test]
    fn test_partition_is_disjoint_and_exhaustive() {
        let input = sample();
        let rules = rules_for(Entity::Customer);
        let partition = Partitioner::new(&rules).partition(input.clone());

        assert_eq!(partition.clean.len() + partition.rejected.len(), input.len());

        let clean: BTreeSet<Option<String>> =
            partition.clean.iter().map(|r| Some(r.key.clone())).collect();
        let rejected: BTreeSet<Option<String>> =
            partition.rejected.iter().map(|r| r.key.clone()).collect();
        assert!(clean.is_disjoint(&rejected));

        let all: BTreeSet<Option<String>> = input.iter().map(|r| r.key.clone()).collect();
        let union: BTreeSet<Option<String>> = clean.union(&rejected).cloned().collect();
        assert_eq!(union, all);
    }

    #[test]
    fn test_one_reason_per_reject_and_raw_values_kept() {
        let rules = rules_for(Entity::Customer);
        let partition = Partitioner::new(&rules).partition(sample());

        let reasons: Vec<(Option<&str>, &str)> = partition
            .rejected
            .iter()
            .map(|r| (r.key.as_deref(), r.reject_reason.as_str()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (Some("C2"), "AGE_OUT_OF_RANGE"),
                (Some("C3"), "MISSING_COUNTRY"),
                (None, "MISSING_CUSTOMER_ID"),
            ]
        );
        assert_eq!(
            partition.rejected[0].raw.get("customer_age"),
            Some(&crate::domain::record::RawValue::Number(15.0))
        );
    }

    #[test]
    fn test_violation_counts_ignore_priority() {
        let rules = rules_for(Entity::Customer);
        let partition = Partitioner::new(&rules).partition(sample());

        assert_eq!(partition.violations["customer_age_in_range"], 2);
        assert_eq!(partition.violations["customer_country_present"], 1);
        assert_eq!(partition.violations["risk_score_in_range"], 1);
        assert_eq!(partition.violations["customer_id_present"], 1);
        assert_eq!(partition.violations["customer_age_numeric"], 0);
        assert_eq!(partition.violations.len(), rules.rules().len());
    }

    #[test]
    fn test_keyless_record_without_key_rule_is_unclassified() {
        let rules = rules_for(Entity::Customer);
        let without_key_rule: Vec<_> = rules.rules()[1..].to_vec();
        let rules = RuleSet::new(Entity::Customer, without_key_rule).unwrap();
        let partition = Partitioner::new(&rules).partition(customers(vec![json!({
            "customer_country": "NZ", "customer_age": 30, "risk_score": 300
        })]));
        assert_eq!(partition.rejected[0].reject_reason, "OTHER");
        assert_eq!(
            partition.rejected[0].violation_kind,
            ViolationKind::Unclassified
        );
    }
}
