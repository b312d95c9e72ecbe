// assay-core/src/domain/quality/metrics.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::derive::round2;
use super::partition::Partition;
use super::prune::PruneOutcome;
use crate::domain::entity::Entity;

/// Row-count and failure-rate metrics of one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetrics {
    pub entity: Entity,
    pub raw_total: u64,
    pub distinct_keys: u64,
    pub duplicates: u64,
    pub violations: BTreeMap<String, u64>,
    pub clean: u64,
    pub rejected: u64,
    pub clean_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orphaned_events: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_events: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Percentage(f64),
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Percentage(p) => write!(f, "{p:.2}%"),
        }
    }
}

impl EntityMetrics {
    /// Flat view: `raw_total`, `violations.<rule>`, `clean_pct`, ...
    pub fn to_metric_map(&self) -> BTreeMap<String, MetricValue> {
        let mut map = BTreeMap::new();
        map.insert("raw_total".to_string(), MetricValue::Count(self.raw_total));
        map.insert(
            "distinct_keys".to_string(),
            MetricValue::Count(self.distinct_keys),
        );
        map.insert("duplicates".to_string(), MetricValue::Count(self.duplicates));
        for (rule, count) in &self.violations {
            map.insert(format!("violations.{rule}"), MetricValue::Count(*count));
        }
        map.insert("clean".to_string(), MetricValue::Count(self.clean));
        map.insert("rejected".to_string(), MetricValue::Count(self.rejected));
        map.insert(
            "clean_pct".to_string(),
            MetricValue::Percentage(self.clean_pct),
        );
        if let Some(orphaned) = self.orphaned_events {
            map.insert("orphaned_events".to_string(), MetricValue::Count(orphaned));
        }
        if let Some(superseded) = self.superseded_events {
            map.insert(
                "superseded_events".to_string(),
                MetricValue::Count(superseded),
            );
        }
        map
    }
}

/// Metrics of every entity of one run, keyed by table name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub entities: BTreeMap<String, EntityMetrics>,
}

impl QualityReport {
    pub fn insert(&mut self, metrics: EntityMetrics) {
        self.entities
            .insert(metrics.entity.table().to_string(), metrics);
    }

    pub fn get(&self, entity: Entity) -> Option<&EntityMetrics> {
        self.entities.get(entity.table())
    }
}

pub struct MetricsReporter;

impl MetricsReporter {
    /// `raw_total` counts input rows before deduplication, `distinct_keys` the
    /// rows left after it. For events, `clean` counts the rows that survived
    /// referential pruning.
    pub fn report(
        entity: Entity,
        raw_total: usize,
        distinct_keys: usize,
        partition: &Partition,
        pruned: Option<&PruneOutcome>,
    ) -> EntityMetrics {
        let raw_total = raw_total as u64;
        let distinct_keys = distinct_keys as u64;
        let clean = match pruned {
            Some(outcome) => outcome.kept.len() as u64,
            None => partition.clean.len() as u64,
        };

        EntityMetrics {
            entity,
            raw_total,
            distinct_keys,
            duplicates: raw_total.saturating_sub(distinct_keys),
            violations: partition.violations.clone(),
            clean,
            rejected: partition.rejected.len() as u64,
            clean_pct: clean_pct(clean, raw_total),
            orphaned_events: pruned.map(|o| o.orphaned.len() as u64),
            superseded_events: pruned.map(|o| o.superseded as u64),
        }
    }
}

fn clean_pct(clean: u64, raw_total: u64) -> f64 {
    if raw_total == 0 {
        return 0.0;
    }
    round2(100.0 * clean as f64 / raw_total as f64)
}
