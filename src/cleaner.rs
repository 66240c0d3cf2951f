//! Table cleaning
//!
//! Turns a raw table into a [`HealthSeries`] in four stages:
//!
//! 1. Parse - dates and numeric cells are typed; malformed cells abort
//! 2. Drop-missing - rows missing any tracked value are discarded
//! 3. Outlier removal - one IQR fence pass per metric, sequentially
//! 4. Sort - stable ascending sort by date
//!
//! The outlier passes run in the fixed order of
//! [`Metric::OUTLIER_PASS_ORDER`]; each pass recomputes its quartiles
//! over the rows surviving the previous passes, so the order changes
//! the result and is part of the contract.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::stats::Fences;
use crate::table::{self, RawTable, SchemaError};
use crate::types::{CleanReport, HealthRecord, HealthSeries, Metric, OutlierPass};

/// Clean a raw table into a health series.
///
/// Fails with [`SchemaError`] when a required column is absent or a
/// non-missing cell cannot be parsed. An output with zero records is
/// valid (every row was missing or fenced out), not an error.
///
/// Pure function of its input; the table is not modified.
pub fn clean(table: &RawTable) -> Result<HealthSeries, SchemaError> {
    clean_with_report(table).map(|(series, _)| series)
}

/// Clean a raw table, also returning per-stage drop accounting.
pub fn clean_with_report(table: &RawTable) -> Result<(HealthSeries, CleanReport), SchemaError> {
    let layout = resolve_layout(table)?;

    let mut records = Vec::with_capacity(table.len());
    let mut rows_dropped_missing = 0usize;

    for row in 0..table.len() {
        match parse_row(table, &layout, row)? {
            Some(record) => records.push(record),
            None => rows_dropped_missing += 1,
        }
    }

    let mut outlier_passes = Vec::with_capacity(Metric::OUTLIER_PASS_ORDER.len());
    for metric in Metric::OUTLIER_PASS_ORDER {
        let before = records.len();
        records = outlier_pass(records, metric);
        outlier_passes.push(OutlierPass {
            metric,
            rows_dropped: before - records.len(),
        });
    }

    let report = CleanReport {
        rows_read: table.len(),
        rows_dropped_missing,
        outlier_passes,
        rows_kept: records.len(),
    };

    Ok((HealthSeries::from_records(records), report))
}

/// One problem found while checking a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableIssue {
    /// 1-based data row the issue was found on.
    pub row: usize,
    /// Column the issue belongs to.
    pub column: String,
    pub message: String,
}

/// Pre-flight check result for a raw table.
///
/// Unlike [`clean`], validation never fails: every problem is collected
/// so a caller can show them all at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableReport {
    pub rows_read: usize,
    /// Required columns absent from the table.
    pub missing_columns: Vec<String>,
    /// Malformed cells, one issue per affected row.
    pub issues: Vec<TableIssue>,
    /// Rows that would be dropped for missing tracked values.
    pub rows_with_missing: usize,
    /// Rows that parse cleanly.
    pub rows_valid: usize,
}

impl TableReport {
    /// True when cleaning this table would not raise a schema error.
    pub fn is_clean(&self) -> bool {
        self.missing_columns.is_empty() && self.issues.is_empty()
    }
}

/// Check a table without cleaning it, collecting every problem.
pub fn validate(table: &RawTable) -> TableReport {
    let layout = match resolve_layout(table) {
        Ok(layout) => layout,
        Err(err) => {
            let missing_columns = match err {
                SchemaError::MissingColumns { columns } => columns,
                _ => Vec::new(),
            };
            return TableReport {
                rows_read: table.len(),
                missing_columns,
                issues: Vec::new(),
                rows_with_missing: 0,
                rows_valid: 0,
            };
        }
    };

    let mut issues = Vec::new();
    let mut rows_with_missing = 0usize;
    let mut rows_valid = 0usize;

    for row in 0..table.len() {
        match parse_row(table, &layout, row) {
            Ok(Some(_)) => rows_valid += 1,
            Ok(None) => rows_with_missing += 1,
            Err(SchemaError::InvalidDate { row, value }) => issues.push(TableIssue {
                row,
                column: "date".to_string(),
                message: format!("unparseable date '{value}'"),
            }),
            Err(SchemaError::InvalidNumber { row, column, value }) => issues.push(TableIssue {
                row,
                column,
                message: format!("unparseable value '{value}'"),
            }),
            Err(SchemaError::MissingColumns { .. }) => {}
        }
    }

    TableReport {
        rows_read: table.len(),
        missing_columns: Vec::new(),
        issues,
        rows_with_missing,
        rows_valid,
    }
}

/// Resolved cell positions for one table.
struct ColumnLayout {
    date: usize,
    sleep_hours: usize,
    steps: usize,
    exercise_minutes: usize,
    heart_rate: usize,
    /// Non-schema columns as (original header, index).
    extras: Vec<(String, usize)>,
}

fn resolve_layout(table: &RawTable) -> Result<ColumnLayout, SchemaError> {
    let (Some(date), Some(sleep_hours), Some(steps), Some(exercise_minutes), Some(heart_rate)) = (
        table.column_index("date"),
        table.column_index("sleep_hours"),
        table.column_index("steps"),
        table.column_index("exercise_minutes"),
        table.column_index("heart_rate"),
    ) else {
        return Err(SchemaError::MissingColumns {
            columns: table.missing_required_columns(),
        });
    };

    let extras = table
        .columns
        .iter()
        .enumerate()
        .filter(|(idx, _)| {
            ![date, sleep_hours, steps, exercise_minutes, heart_rate].contains(idx)
        })
        .map(|(idx, name)| {
            (
                name.trim().trim_start_matches('\u{feff}').to_string(),
                idx,
            )
        })
        .collect();

    Ok(ColumnLayout {
        date,
        sleep_hours,
        steps,
        exercise_minutes,
        heart_rate,
        extras,
    })
}

/// Parse one row. `Ok(None)` means a tracked value was missing and the
/// row is dropped; malformed non-missing cells are errors.
fn parse_row(
    table: &RawTable,
    layout: &ColumnLayout,
    row: usize,
) -> Result<Option<HealthRecord>, SchemaError> {
    let date = parse_date_cell(table.cell(row, layout.date), row)?;
    let sleep_hours = parse_metric_cell(table.cell(row, layout.sleep_hours), Metric::SleepHours, row)?;
    let steps = parse_metric_cell(table.cell(row, layout.steps), Metric::Steps, row)?;
    let exercise_minutes =
        parse_metric_cell(table.cell(row, layout.exercise_minutes), Metric::ExerciseMinutes, row)?;
    let heart_rate = parse_metric_cell(table.cell(row, layout.heart_rate), Metric::HeartRate, row)?;

    let (Some(date), Some(sleep_hours), Some(steps), Some(exercise_minutes), Some(heart_rate)) =
        (date, sleep_hours, steps, exercise_minutes, heart_rate)
    else {
        return Ok(None);
    };

    let mut extras = BTreeMap::new();
    for (name, idx) in &layout.extras {
        extras.insert(name.clone(), table.cell(row, *idx).to_string());
    }

    Ok(Some(HealthRecord {
        date,
        sleep_hours,
        steps,
        exercise_minutes,
        heart_rate,
        extras,
    }))
}

fn parse_date_cell(cell: &str, row: usize) -> Result<Option<chrono::NaiveDate>, SchemaError> {
    if table::is_missing(cell) {
        return Ok(None);
    }
    match table::parse_date(cell) {
        Some(date) => Ok(Some(date)),
        None => Err(SchemaError::InvalidDate {
            row: row + 1,
            value: cell.trim().to_string(),
        }),
    }
}

fn parse_metric_cell(cell: &str, metric: Metric, row: usize) -> Result<Option<f64>, SchemaError> {
    if table::is_missing(cell) {
        return Ok(None);
    }
    match cell.trim().parse::<f64>() {
        // Parsed infinities cannot sit inside any fence; treat as missing.
        Ok(value) if value.is_finite() => Ok(Some(value)),
        Ok(_) => Ok(None),
        Err(_) => Err(SchemaError::InvalidNumber {
            row: row + 1,
            column: metric.as_str().to_string(),
            value: cell.trim().to_string(),
        }),
    }
}

/// Drop records outside the IQR fences of `metric`, computed over the
/// records given (the survivors of earlier passes).
fn outlier_pass(records: Vec<HealthRecord>, metric: Metric) -> Vec<HealthRecord> {
    let values: Vec<f64> = records.iter().map(|r| metric.value(r)).collect();
    let Some(fences) = Fences::from_values(&values) else {
        return records;
    };
    records
        .into_iter()
        .filter(|r| fences.contains(metric.value(r)))
        .collect()
}
