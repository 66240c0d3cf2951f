//! Healthtrend - Daily health log cleaning and weight-change trend estimation
//!
//! Healthtrend turns raw daily health logs (sleep, steps, exercise,
//! heart rate) into a weight-change trend estimate through a
//! deterministic pipeline: CSV ingestion → cleaning (missing rows, IQR
//! outlier passes) → summary statistics → weight-change estimate →
//! report payload.
//!
//! The estimate comes from a fixed scoring rule, not a fitted model;
//! see [`predictor`] for the coefficients.
//!
//! ## Quick start
//!
//! ```
//! use healthtrend::pipeline;
//!
//! let csv = "date,sleep_hours,steps,exercise_minutes,heart_rate\n\
//!            2024-01-01,7.5,9500,40,66\n\
//!            2024-01-02,6.9,8200,20,74\n";
//!
//! let analysis = pipeline::analyze_csv(csv)?;
//! if let Some(prediction) = &analysis.prediction {
//!     println!(
//!         "predicted {} of {:.1} lbs",
//!         prediction.direction.as_str(),
//!         prediction.weight_change_lbs.abs(),
//!     );
//! }
//! # Ok::<(), healthtrend::AnalysisError>(())
//! ```

pub mod cleaner;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod predictor;
pub mod report;
pub mod sample;
pub mod stats;
pub mod table;
pub mod types;

pub use cleaner::{clean, clean_with_report, validate, TableReport};
pub use error::AnalysisError;
pub use pipeline::{analyze_csv, analyze_path, analyze_table, Analysis};
pub use report::{ReportBuilder, REPORT_VERSION};
pub use sample::SampleGenerator;
pub use table::{RawTable, SchemaError};
pub use types::{HealthRecord, HealthReport, HealthSeries, Prediction, TrendDirection};

/// Crate version embedded in report payloads
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "healthtrend";
