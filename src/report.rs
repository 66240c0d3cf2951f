//! Report assembly
//!
//! Wraps an [`Analysis`] into the versioned [`HealthReport`] payload
//! consumers receive, stamped with producer identity and a generation
//! timestamp.

use chrono::Utc;
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::pipeline::Analysis;
use crate::types::{HealthReport, ReportProducer};
use crate::{CRATE_VERSION, PRODUCER_NAME};

/// Version of the report payload format.
pub const REPORT_VERSION: &str = "1.0.0";

/// Builds report payloads with a stable producer identity.
///
/// Each builder carries an instance id, random by default, that ties
/// the reports of one producer together.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    instance_id: String,
}

impl ReportBuilder {
    /// New builder with a random instance id.
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Pin the instance id, for reproducible payloads.
    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = instance_id.into();
        self
    }

    /// Assemble the payload for one analysis.
    pub fn build(&self, analysis: &Analysis) -> HealthReport {
        HealthReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: CRATE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            generated_at_utc: Utc::now().to_rfc3339(),
            cleaning: analysis.cleaning.clone(),
            metrics: analysis.summary.clone(),
            prediction: analysis.prediction.clone(),
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a report to compact JSON.
pub fn to_json(report: &HealthReport) -> Result<String, AnalysisError> {
    Ok(serde_json::to_string(report)?)
}

/// Serialize a report to pretty-printed JSON.
pub fn to_json_pretty(report: &HealthReport) -> Result<String, AnalysisError> {
    Ok(serde_json::to_string_pretty(report)?)
}
