//! Weight-change estimation
//!
//! A fixed linear scoring rule, hand-tuned around population reference
//! targets. The coefficients are constants of the model, not the output
//! of a regression fit on data, and the estimate is a directional
//! trend signal rather than a medical claim.

use thiserror::Error;

use crate::stats;
use crate::types::{HealthRecord, HealthSeries, Prediction, TrendDirection};

/// Reference nightly sleep in hours.
pub const SLEEP_TARGET_HOURS: f64 = 7.0;
/// Reference daily step count.
pub const STEPS_TARGET: f64 = 10_000.0;
/// Reference daily exercise in minutes.
pub const EXERCISE_TARGET_MINUTES: f64 = 30.0;
/// Reference resting heart rate in bpm.
pub const HEART_RATE_TARGET_BPM: f64 = 70.0;

/// Score per hour of sleep above target.
pub const SLEEP_WEIGHT: f64 = 0.3;
/// Score per step above target.
pub const STEPS_WEIGHT: f64 = 0.000_04;
/// Score per exercise minute above target.
pub const EXERCISE_WEIGHT: f64 = 0.02;
/// Score per bpm above target. Negative: an elevated resting heart
/// rate pulls the score down.
pub const HEART_RATE_WEIGHT: f64 = -0.01;

/// Pounds of estimated change per unit of mean activity score.
pub const POUNDS_PER_SCORE: f64 = 2.0;

/// No records to estimate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot predict from an empty series")]
pub struct EmptySeriesError;

/// Activity score for a single day.
///
/// Computes
///
/// ```text
/// score = 0.3     * (sleep_hours - 7)
///       + 0.00004 * (steps - 10000)
///       + 0.02    * (exercise_minutes - 30)
///       - 0.01    * (heart_rate - 70)
/// ```
///
/// Zero at the reference targets; positive on healthier-than-reference
/// days.
pub fn activity_score(record: &HealthRecord) -> f64 {
    SLEEP_WEIGHT * (record.sleep_hours - SLEEP_TARGET_HOURS)
        + STEPS_WEIGHT * (record.steps - STEPS_TARGET)
        + EXERCISE_WEIGHT * (record.exercise_minutes - EXERCISE_TARGET_MINUTES)
        + HEART_RATE_WEIGHT * (record.heart_rate - HEART_RATE_TARGET_BPM)
}

/// Estimate the weight change in pounds for a cleaned series.
///
/// The mean daily score is flipped and scaled by [`POUNDS_PER_SCORE`]:
/// sustained positive scores predict weight loss, so the sign of the
/// result is gain-positive.
pub fn predict_weight_change(series: &HealthSeries) -> Result<f64, EmptySeriesError> {
    predict(series).map(|p| p.weight_change_lbs)
}

/// Full estimate with the intermediate values callers report on.
pub fn predict(series: &HealthSeries) -> Result<Prediction, EmptySeriesError> {
    let scores: Vec<f64> = series.iter().map(activity_score).collect();
    let mean_activity_score = stats::mean(&scores).ok_or(EmptySeriesError)?;
    let weight_change_lbs = -mean_activity_score * POUNDS_PER_SCORE;

    Ok(Prediction {
        weight_change_lbs,
        mean_activity_score,
        days: series.len(),
        direction: TrendDirection::from_weight_change(weight_change_lbs),
    })
}
