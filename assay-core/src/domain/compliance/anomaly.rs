// assay-core/src/domain/compliance/anomaly.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::quality::QualityReport;

#[derive(Debug, Error, PartialEq)]
pub enum AnomalyError {
    #[error(
        "Clean row count deviation too high for '{entity}': {deviation:.2}% (Threshold: {threshold:.2}%). Prev: {prev}, Curr: {curr}"
    )]
    DeviationExceeded {
        entity: String,
        deviation: f64,
        threshold: f64,
        prev: u64,
        curr: u64,
    },
    #[error("No historical data available for anomaly check (First Run).")]
    NoHistory,
}

/// Bookkeeping persisted between runs (`state.json`).
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct RunState {
    #[serde(default)]
    pub entities: BTreeMap<String, EntityRunState>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct EntityRunState {
    pub last_run_at: String,
    pub clean_count: u64,
    pub rejected_count: u64,
}

impl RunState {
    pub fn from_report(report: &QualityReport, run_at: &str) -> Self {
        let entities = report
            .entities
            .iter()
            .map(|(table, metrics)| {
                (
                    table.clone(),
                    EntityRunState {
                        last_run_at: run_at.to_string(),
                        clean_count: metrics.clean,
                        rejected_count: metrics.rejected,
                    },
                )
            })
            .collect();
        Self { entities }
    }

    pub fn clean_count(&self, table: &str) -> Option<u64> {
        self.entities.get(table).map(|s| s.clean_count)
    }
}

pub struct RowCountCheck;

impl RowCountCheck {
    /// Relative deviation of `current_count` from `previous_count`.
    ///
    /// A missing history is reported as `NoHistory`; callers treat it as a
    /// pass. A previous count of zero accepts everything.
    pub fn validate(
        entity: &str,
        current_count: u64,
        previous_count: Option<u64>,
        threshold: f64,
    ) -> Result<(), AnomalyError> {
        let prev = match previous_count {
            Some(p) if p > 0 => p,
            Some(_) => return Ok(()),
            None => return Err(AnomalyError::NoHistory),
        };

        let diff = current_count.abs_diff(prev);
        let ratio = diff as f64 / prev as f64;

        if ratio > threshold {
            return Err(AnomalyError::DeviationExceeded {
                entity: entity.to_string(),
                deviation: ratio * 100.0,
                threshold: threshold * 100.0,
                prev,
                curr: current_count,
            });
        }

        Ok(())
    }

    /// Checks every entity of `report` against `previous`. Returns the
    /// deviations found; entities without history are skipped.
    pub fn check_report(
        report: &QualityReport,
        previous: Option<&RunState>,
        threshold: f64,
    ) -> Vec<AnomalyError> {
        report
            .entities
            .iter()
            .filter_map(|(table, metrics)| {
                let prev = previous.and_then(|state| state.clean_count(table));
                match Self::validate(table, metrics.clean, prev, threshold) {
                    Ok(()) | Err(AnomalyError::NoHistory) => None,
                    Err(e) => Some(e),
                }
            })
            .collect()
    }
}
