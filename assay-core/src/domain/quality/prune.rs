// assay-core/src/domain/quality/prune.rs

use chrono::NaiveDateTime;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entity::EntitySchema;
use crate::domain::record::{CleanRecord, ViolationKind};

/// Result of pruning child records against their parent's clean set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PruneOutcome {
    /// At most one record per parent key, ordered by parent key.
    pub kept: Vec<CleanRecord>,
    /// Keys of children whose parent is not clean.
    pub orphaned: Vec<String>,
    /// Children dropped because a more recent one shares their parent.
    pub superseded: usize,
}

pub struct ReferentialPruner<'a> {
    schema: &'a EntitySchema,
}

impl<'a> ReferentialPruner<'a> {
    pub fn new(schema: &'a EntitySchema) -> Self {
        Self { schema }
    }

    /// Drops orphans, then keeps the latest child per parent: occurrence
    /// timestamp, then ingestion timestamp (nulls last), then smallest key.
    pub fn prune(&self, children: Vec<CleanRecord>, parents: &BTreeSet<String>) -> PruneOutcome {
        let Some(parent_field) = self.schema.parent_field else {
            return PruneOutcome {
                kept: children,
                ..PruneOutcome::default()
            };
        };

        let mut outcome = PruneOutcome::default();
        let mut by_parent: BTreeMap<String, Vec<CleanRecord>> = BTreeMap::new();

        for child in children {
            let parent = child.get(parent_field).as_text().map(str::to_string);
            match parent {
                Some(parent) if parents.contains(&parent) => {
                    by_parent.entry(parent).or_default().push(child);
                }
                _ => {
                    tracing::debug!(
                        entity = %self.schema.entity,
                        key = %child.key,
                        kind = %ViolationKind::OrphanedReference,
                        "Pruning orphaned record"
                    );
                    outcome.orphaned.push(child.key);
                }
            }
        }

        for (_, mut siblings) in by_parent {
            siblings.sort_by_key(|c| {
                (
                    Reverse(self.occurred_at(c)),
                    Reverse(c.ingested_at),
                    c.key.clone(),
                )
            });
            outcome.superseded += siblings.len().saturating_sub(1);
            if let Some(latest) = siblings.into_iter().next() {
                outcome.kept.push(latest);
            }
        }

        outcome
    }

    fn occurred_at(&self, record: &CleanRecord) -> Option<NaiveDateTime> {
        self.schema
            .occurrence_field
            .and_then(|field| record.get(field).as_timestamp())
    }
}
