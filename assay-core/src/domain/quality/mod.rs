// assay-core/src/domain/quality/mod.rs

pub mod dedup;
pub mod derive;
pub mod metrics;
pub mod partition;
pub mod prune;
pub mod rules;
pub mod standardize;

pub use dedup::Deduplicator;
pub use derive::{DerivedTransaction, Deriver, FailureCategory};
pub use metrics::{EntityMetrics, MetricValue, MetricsReporter, QualityReport};
pub use partition::{Partition, Partitioner};
pub use prune::{PruneOutcome, ReferentialPruner};
pub use rules::{RuleSet, rules_for};
pub use standardize::{EnumerationCatalog, EnumerationDomain, FallbackPolicy, Standardizer};

use std::collections::BTreeMap;

use crate::domain::entity::Entity;
use crate::domain::record::{CleanRecord, RejectRecord};

/// Everything one run publishes, as a unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub customers: Vec<CleanRecord>,
    pub merchants: Vec<CleanRecord>,
    pub transactions: Vec<DerivedTransaction>,
    /// Events left after referential pruning.
    pub events: Vec<CleanRecord>,
    pub rejected: BTreeMap<Entity, Vec<RejectRecord>>,
    pub metrics: QualityReport,
}

impl Snapshot {
    pub fn clean_count(&self, entity: Entity) -> usize {
        match entity {
            Entity::Customer => self.customers.len(),
            Entity::Merchant => self.merchants.len(),
            Entity::Transaction => self.transactions.len(),
            Entity::Event => self.events.len(),
        }
    }

    pub fn rejected_of(&self, entity: Entity) -> &[RejectRecord] {
        self.rejected.get(&entity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pretty JSON array of the clean table. Row order is the key order
    /// produced by the pipeline, so equal inputs render identical bytes.
    pub fn clean_json(&self, entity: Entity) -> Result<String, serde_json::Error> {
        match entity {
            Entity::Customer => serde_json::to_string_pretty(&self.customers),
            Entity::Merchant => serde_json::to_string_pretty(&self.merchants),
            Entity::Transaction => serde_json::to_string_pretty(&self.transactions),
            Entity::Event => serde_json::to_string_pretty(&self.events),
        }
    }

    pub fn rejected_json(&self, entity: Entity) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.rejected_of(entity))
    }

    pub fn metrics_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.metrics)
    }
}
