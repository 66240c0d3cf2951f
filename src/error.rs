//! Error types for the analysis pipeline

use thiserror::Error;

use crate::predictor::EmptySeriesError;
use crate::table::SchemaError;

/// Errors that can occur while ingesting, cleaning or analyzing a
/// table.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Prediction error: {0}")]
    EmptySeries(#[from] EmptySeriesError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
