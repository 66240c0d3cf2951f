//! Pipeline orchestration
//!
//! This module provides the public entry points for the crate. Each
//! runs the full pipeline from raw input to an [`Analysis`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cleaner;
use crate::error::AnalysisError;
use crate::ingest;
use crate::predictor;
use crate::table::RawTable;
use crate::types::{CleanReport, HealthSeries, Prediction, SeriesSummary};

/// Outcome of one full pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Cleaned, date-sorted records.
    pub series: HealthSeries,
    /// Drop accounting from the cleaning stages.
    pub cleaning: CleanReport,
    /// Per-metric summary; `None` when no records survived.
    pub summary: Option<SeriesSummary>,
    /// Weight-change estimate; `None` when no records survived.
    pub prediction: Option<Prediction>,
}

/// Run the full pipeline over an in-memory table.
///
/// Pipeline stages:
/// 1. Clean - schema check, drop missing rows, IQR outlier passes, sort
/// 2. Summarize - per-metric mean/min/max over the survivors
/// 3. Predict - weight-change estimate from daily activity scores
///
/// An input whose rows are all dropped yields an analysis with an
/// empty series and no summary or prediction; only structural problems
/// are errors.
pub fn analyze_table(table: &RawTable) -> Result<Analysis, AnalysisError> {
    let (series, cleaning) = cleaner::clean_with_report(table)?;

    let summary = SeriesSummary::from_series(&series);
    let prediction = if series.is_empty() {
        None
    } else {
        Some(predictor::predict(&series)?)
    };

    Ok(Analysis {
        series,
        cleaning,
        summary,
        prediction,
    })
}

/// Run the full pipeline over CSV text.
pub fn analyze_csv(data: &str) -> Result<Analysis, AnalysisError> {
    analyze_table(&ingest::read_csv_str(data)?)
}

/// Run the full pipeline over a CSV file on disk.
pub fn analyze_path<P: AsRef<Path>>(path: P) -> Result<Analysis, AnalysisError> {
    analyze_table(&ingest::read_csv_path(path)?)
}
