//! Batch processing of a full inventory pull
//!
//! Rows are validated up front, ordered by company and evaluated one by one.
//! A structurally broken row fails the batch; a record with an unparseable
//! numeric field is set aside and reported without stopping the others.

use serde_json::Value;

use crate::clock::Clock;
use crate::company::{sort_key, ExclusionSet};
use crate::engine::RuleEngine;
use crate::error::{RecordError, Result};
use crate::record::{Field, Record};
use crate::report::Report;

/// A record that could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    /// Position of the row in the input
    pub position: usize,
    /// Serial number, when the row carried one
    pub serial: Option<String>,
    pub error: RecordError,
}

/// Result of processing one batch
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Reports to publish, in company order
    pub reports: Vec<Report>,
    /// Records that failed evaluation
    pub failures: Vec<RecordFailure>,
    /// Rows read from the input
    pub records_seen: usize,
}

impl BatchOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// One-line summary for operators
    pub fn summary(&self) -> String {
        format!(
            "Processed {} record(s): {} report(s), {} failed",
            self.records_seen,
            self.reports.len(),
            self.failures.len()
        )
    }
}

/// Validate raw rows into records
///
/// The first broken row fails the whole batch.
pub fn parse_rows(rows: &[Vec<Value>]) -> Result<Vec<Record>> {
    rows.iter()
        .enumerate()
        .map(|(position, row)| {
            Record::from_row(row).map_err(|err| match err {
                RecordError::SchemaError(msg) => {
                    RecordError::schema_error(format!("row {}: {}", position, msg))
                }
                other => other,
            })
        })
        .collect()
}

/// Process raw rows with the standard rule set
pub fn process_data(
    rows: &[Vec<Value>],
    excluded: &ExclusionSet,
    clock: &dyn Clock,
) -> Result<BatchOutcome> {
    let records = parse_rows(rows)?;
    Ok(process_records(records, &RuleEngine::new(), excluded, clock))
}

/// Sort records by company and collect the reports worth emitting
///
/// The sort is stable, so machines of one company keep their input order.
pub fn process_records(
    records: Vec<Record>,
    engine: &RuleEngine,
    excluded: &ExclusionSet,
    clock: &dyn Clock,
) -> BatchOutcome {
    let mut indexed: Vec<(usize, Record)> = records.into_iter().enumerate().collect();
    indexed.sort_by(|(_, a), (_, b)| sort_key(a).cmp(&sort_key(b)));

    let mut outcome = BatchOutcome {
        records_seen: indexed.len(),
        ..Default::default()
    };

    for (position, record) in &indexed {
        match engine.prepare_machine_report(record, excluded, clock) {
            Ok(report) if report.should_emit() => outcome.reports.push(report),
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(
                    position = *position,
                    serial = record.get(Field::SerialNumber).unwrap_or_default(),
                    error = %error,
                    "Skipping record that failed evaluation"
                );
                outcome.failures.push(RecordFailure {
                    position: *position,
                    serial: record.get(Field::SerialNumber).map(str::to_string),
                    error,
                });
            }
        }
    }

    tracing::info!(
        records = outcome.records_seen,
        reports = outcome.reports.len(),
        failed = outcome.failures.len(),
        "Batch processed"
    );

    outcome
}
