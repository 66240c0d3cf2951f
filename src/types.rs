//! Core types for the healthtrend pipeline
//!
//! This module defines the data that flows through each stage: daily
//! health records, the cleaned series, cleaning/outlier accounting, the
//! per-metric summaries, and the report payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::stats;

/// One tracked numeric column of a health record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SleepHours,
    Steps,
    ExerciseMinutes,
    HeartRate,
}

impl Metric {
    /// Outlier passes run in this exact column order; each pass shrinks
    /// the population the next pass computes its quartiles over, so the
    /// order is part of the cleaning contract.
    pub const OUTLIER_PASS_ORDER: [Metric; 4] = [
        Metric::SleepHours,
        Metric::Steps,
        Metric::ExerciseMinutes,
        Metric::HeartRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::SleepHours => "sleep_hours",
            Metric::Steps => "steps",
            Metric::ExerciseMinutes => "exercise_minutes",
            Metric::HeartRate => "heart_rate",
        }
    }

    /// Value of this metric on a record.
    pub fn value(&self, record: &HealthRecord) -> f64 {
        match self {
            Metric::SleepHours => record.sleep_hours,
            Metric::Steps => record.steps,
            Metric::ExerciseMinutes => record.exercise_minutes,
            Metric::HeartRate => record.heart_rate,
        }
    }
}

/// One day of health metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Calendar date of the record. Need not be unique across a series.
    pub date: NaiveDate,
    /// Hours slept.
    pub sleep_hours: f64,
    /// Step count (integer-like, kept as f64).
    pub steps: f64,
    /// Minutes of exercise.
    pub exercise_minutes: f64,
    /// Heart rate (beats per minute).
    pub heart_rate: f64,
    /// Cells from columns outside the tracked schema, passed through
    /// untouched for downstream consumers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl HealthRecord {
    /// Record with the given tracked values and no extra columns.
    pub fn new(
        date: NaiveDate,
        sleep_hours: f64,
        steps: f64,
        exercise_minutes: f64,
        heart_rate: f64,
    ) -> Self {
        Self {
            date,
            sleep_hours,
            steps,
            exercise_minutes,
            heart_rate,
            extras: BTreeMap::new(),
        }
    }
}

/// A cleaned, date-ordered sequence of health records.
///
/// Constructed via [`HealthSeries::from_records`], which applies the
/// ascending stable sort by date; records with equal dates keep their
/// input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthSeries {
    records: Vec<HealthRecord>,
}

impl HealthSeries {
    /// Build a series from records, sorting ascending by date (stable).
    pub fn from_records(mut records: Vec<HealthRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    /// Series with no records.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[HealthRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<HealthRecord> {
        self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HealthRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last dates, `None` for an empty series.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// All values of one metric, in series order.
    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.records.iter().map(|r| metric.value(r)).collect()
    }
}

/// Rows removed by one outlier pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlierPass {
    /// Column the pass filtered on.
    pub metric: Metric,
    /// Rows outside the fences of this pass.
    pub rows_dropped: usize,
}

/// Accounting for one cleaning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    /// Data rows in the input table.
    pub rows_read: usize,
    /// Rows dropped for a missing tracked value.
    pub rows_dropped_missing: usize,
    /// Outlier passes in execution order, one entry per tracked metric.
    pub outlier_passes: Vec<OutlierPass>,
    /// Rows surviving into the cleaned series.
    pub rows_kept: usize,
}

/// Mean/min/max of one metric over a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricSummary {
    /// Summary of a value set, `None` for empty input.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mean = stats::mean(values)?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            min = min.min(*v);
            max = max.max(*v);
        }
        Some(Self { mean, min, max })
    }
}

/// Per-metric summaries for a cleaned series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Number of records summarized.
    pub days: usize,
    /// Earliest record date.
    pub date_start: NaiveDate,
    /// Latest record date.
    pub date_end: NaiveDate,
    pub sleep_hours: MetricSummary,
    pub steps: MetricSummary,
    pub exercise_minutes: MetricSummary,
    pub heart_rate: MetricSummary,
}

impl SeriesSummary {
    /// Summarize a series; `None` when it is empty (aggregates over
    /// nothing are undefined, not zero).
    pub fn from_series(series: &HealthSeries) -> Option<Self> {
        let (date_start, date_end) = series.date_range()?;
        Some(Self {
            days: series.len(),
            date_start,
            date_end,
            sleep_hours: MetricSummary::from_values(&series.values(Metric::SleepHours))?,
            steps: MetricSummary::from_values(&series.values(Metric::Steps))?,
            exercise_minutes: MetricSummary::from_values(&series.values(Metric::ExerciseMinutes))?,
            heart_rate: MetricSummary::from_values(&series.values(Metric::HeartRate))?,
        })
    }
}

/// Rendered sign of a weight-change estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Gain,
    Loss,
}

impl TrendDirection {
    /// A strictly positive estimate reads as gain, anything else as loss.
    pub fn from_weight_change(lbs: f64) -> Self {
        if lbs > 0.0 {
            TrendDirection::Gain
        } else {
            TrendDirection::Loss
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Gain => "gain",
            TrendDirection::Loss => "loss",
        }
    }
}

/// Weight-change estimate with the shape of its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Estimated change in pounds; positive is gain, negative is loss.
    pub weight_change_lbs: f64,
    /// Mean per-record activity score the estimate was derived from.
    pub mean_activity_score: f64,
    /// Records contributing to the mean.
    pub days: usize,
    /// Sign of the estimate, as rendered to users.
    pub direction: TrendDirection,
}

/// Report producer metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Complete analysis report payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub generated_at_utc: String,
    pub cleaning: CleanReport,
    /// Absent when cleaning left no records.
    pub metrics: Option<SeriesSummary>,
    /// Absent when cleaning left no records.
    pub prediction: Option<Prediction>,
}
