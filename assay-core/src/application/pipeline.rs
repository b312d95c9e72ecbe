// assay-core/src/application/pipeline.rs

use std::collections::{BTreeMap, BTreeSet};

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::domain::compliance::{RowCountCheck, RunState};
use crate::domain::entity::Entity;
use crate::domain::error::DomainError;
use crate::domain::project::ProjectConfig;
use crate::domain::quality::{
    Deduplicator, Deriver, EnumerationCatalog, MetricsReporter, Partition, Partitioner,
    QualityReport, ReferentialPruner, RuleSet, Snapshot, Standardizer, rules_for,
};
use crate::domain::record::RawRecord;
use crate::error::AssayError;
use crate::ports::{RecordSource, SnapshotSink};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub success: bool,
    pub run_at: String,
    pub clean_rows: u64,
    pub rejected_rows: u64,
    /// Anomalies tolerated because strict mode was off.
    pub warnings: Vec<String>,
    pub metrics: QualityReport,
}

/// Per-entity output of the dedup -> standardize -> validate chain.
#[derive(Debug, Default)]
struct EntityOutcome {
    raw_total: usize,
    distinct_keys: usize,
    partition: Partition,
}

/// Runs one batch end to end and publishes the result through `sink`.
///
/// Any fatal condition (missing or malformed input, bad configuration,
/// strict-mode anomaly) returns before `publish`, so the previously published
/// snapshot stays in place.
pub async fn run_pipeline<S, K>(
    source: &S,
    sink: &K,
    config: &ProjectConfig,
) -> Result<RunResult, AssayError>
where
    S: RecordSource,
    K: SnapshotSink,
{
    let start_time = std::time::Instant::now();
    let catalog = EnumerationCatalog::default().with_overrides(&config.enumerations)?;

    // 1. LOAD (all collections, before any processing)
    let batches = try_join_all(Entity::ALL.iter().map(|entity| source.load(*entity))).await?;
    for (entity, batch) in Entity::ALL.iter().zip(&batches) {
        info!(entity = %entity, rows = batch.len(), "Raw collection loaded");
    }

    // 2. PER-ENTITY CHAINS (independent blocking tasks)
    let mut tasks = Vec::with_capacity(Entity::ALL.len());
    for (entity, raw) in Entity::ALL.into_iter().zip(batches) {
        let standardizer = Standardizer::new(entity, &catalog)?;
        let rules = rules_for(entity, &catalog)?;
        tasks.push(tokio::task::spawn_blocking(move || {
            process_entity(raw, &standardizer, &rules)
        }));
    }
    let outcomes = try_join_all(tasks)
        .await
        .map_err(|e| AssayError::InternalError(format!("entity task failed: {}", e)))?;
    let mut outcomes: BTreeMap<Entity, EntityOutcome> =
        Entity::ALL.into_iter().zip(outcomes).collect();

    let customers = outcomes.remove(&Entity::Customer).unwrap_or_default();
    let merchants = outcomes.remove(&Entity::Merchant).unwrap_or_default();
    let transactions = outcomes.remove(&Entity::Transaction).unwrap_or_default();
    let events = outcomes.remove(&Entity::Event).unwrap_or_default();

    // 3. REFERENTIAL PRUNING (needs the clean transaction set)
    let parents: BTreeSet<String> = transactions
        .partition
        .clean
        .iter()
        .map(|t| t.key.clone())
        .collect();
    let pruned = ReferentialPruner::new(Entity::Event.schema())
        .prune(events.partition.clean.clone(), &parents);
    info!(
        kept = pruned.kept.len(),
        orphaned = pruned.orphaned.len(),
        superseded = pruned.superseded,
        "Events pruned against clean transactions"
    );

    // 4. METRICS
    let mut metrics = QualityReport::default();
    for (entity, outcome) in [
        (Entity::Customer, &customers),
        (Entity::Merchant, &merchants),
        (Entity::Transaction, &transactions),
    ] {
        metrics.insert(MetricsReporter::report(
            entity,
            outcome.raw_total,
            outcome.distinct_keys,
            &outcome.partition,
            None,
        ));
    }
    metrics.insert(MetricsReporter::report(
        Entity::Event,
        events.raw_total,
        events.distinct_keys,
        &events.partition,
        Some(&pruned),
    ));

    // 5. ANOMALY CHECK (against the last published run)
    let previous = sink.previous_state().await?;
    let threshold = config.governance.row_count_threshold;
    let mut warnings = Vec::new();
    let anomalies = RowCountCheck::check_report(&metrics, previous.as_ref(), threshold);
    if !anomalies.is_empty() {
        let messages: Vec<String> = anomalies.iter().map(ToString::to_string).collect();
        if config.governance.strict {
            return Err(DomainError::ComplianceError(messages.join("; ")).into());
        }
        for message in &messages {
            warn!(message = %message, "Anomaly tolerated (strict mode off)");
        }
        warnings = messages;
    }

    // 6. ASSEMBLE + PUBLISH
    let snapshot = Snapshot {
        customers: customers.partition.clean,
        merchants: merchants.partition.clean,
        transactions: Deriver::derive_all(transactions.partition.clean),
        events: pruned.kept,
        rejected: BTreeMap::from([
            (Entity::Customer, customers.partition.rejected),
            (Entity::Merchant, merchants.partition.rejected),
            (Entity::Transaction, transactions.partition.rejected),
            (Entity::Event, events.partition.rejected),
        ]),
        metrics,
    };

    let run_at = chrono::Utc::now().to_rfc3339();
    let state = RunState::from_report(&snapshot.metrics, &run_at);
    sink.publish(&snapshot, &state).await?;

    let clean_rows: u64 = Entity::ALL
        .iter()
        .map(|e| snapshot.clean_count(*e) as u64)
        .sum();
    let rejected_rows: u64 = Entity::ALL
        .iter()
        .map(|e| snapshot.rejected_of(*e).len() as u64)
        .sum();
    info!(
        clean = clean_rows,
        rejected = rejected_rows,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Run complete"
    );

    Ok(RunResult {
        success: true,
        run_at,
        clean_rows,
        rejected_rows,
        warnings,
        metrics: snapshot.metrics,
    })
}

#[instrument(skip_all, fields(entity = %rules.entity()))]
fn process_entity(
    raw: Vec<RawRecord>,
    standardizer: &Standardizer,
    rules: &RuleSet,
) -> EntityOutcome {
    let entity = rules.entity();
    let raw_total = raw.len();
    let current = Deduplicator::new(entity.schema()).current_versions(&raw);
    let distinct_keys = current.len();

    let standardized = current
        .into_iter()
        .map(|record| standardizer.standardize(record))
        .collect();
    let partition = Partitioner::new(rules).partition(standardized);

    info!(
        raw = raw_total,
        distinct = distinct_keys,
        clean = partition.clean.len(),
        rejected = partition.rejected.len(),
        "Entity partitioned"
    );

    EntityOutcome {
        raw_total,
        distinct_keys,
        partition,
    }
}
