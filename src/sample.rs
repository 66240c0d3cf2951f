//! Synthetic sample data
//!
//! Generates plausible daily health rows for demos and tests. Values
//! are drawn from normal distributions around healthy reference ranges
//! and clipped to sane bounds, so a generated table always passes
//! schema validation.

use chrono::{Duration, NaiveDate, Utc};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::Normal;

use crate::error::AnalysisError;
use crate::ingest;
use crate::table::{RawTable, REQUIRED_COLUMNS};

/// Days of data generated when none are requested.
pub const DEFAULT_SAMPLE_DAYS: usize = 30;
/// Seed used when none is requested, for reproducible demos.
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

/// Deterministic generator for synthetic daily health tables.
///
/// The same seed, day count and end date always produce the same
/// table.
///
/// # Examples
///
/// ```
/// use healthtrend::sample::SampleGenerator;
///
/// let table = SampleGenerator::new().with_days(7).generate();
/// assert_eq!(table.len(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct SampleGenerator {
    days: usize,
    seed: u64,
    end_date: NaiveDate,
}

impl Default for SampleGenerator {
    fn default() -> Self {
        Self {
            days: DEFAULT_SAMPLE_DAYS,
            seed: DEFAULT_SAMPLE_SEED,
            end_date: Utc::now().date_naive(),
        }
    }
}

impl SampleGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of consecutive days to generate.
    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    /// RNG seed; identical seeds give identical tables.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Date of the last generated row; earlier rows count backwards
    /// from it.
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = end_date;
        self
    }

    /// Generate the table, one row per day in ascending date order.
    pub fn generate(&self) -> RawTable {
        let mut rng = StdRng::seed_from_u64(self.seed);

        // Whole columns are drawn in schema order so that the stream
        // of draws, and therefore the output, is stable for a seed.
        let sleep = draw_column(&mut rng, self.days, 7.5, 0.8, 5.0, 10.0);
        let steps = draw_column(&mut rng, self.days, 8_000.0, 2_000.0, 3_000.0, 15_000.0);
        let exercise = draw_column(&mut rng, self.days, 40.0, 15.0, 10.0, 90.0);
        let heart_rate = draw_column(&mut rng, self.days, 72.0, 5.0, 60.0, 100.0);

        let start = self.end_date - Duration::days(self.days.saturating_sub(1) as i64);
        let rows = (0..self.days)
            .map(|i| {
                vec![
                    (start + Duration::days(i as i64)).to_string(),
                    format!("{:.2}", sleep[i]),
                    format!("{:.0}", steps[i]),
                    format!("{:.1}", exercise[i]),
                    format!("{:.1}", heart_rate[i]),
                ]
            })
            .collect();

        RawTable::new(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        )
    }

    /// Generate the table and render it as CSV text.
    pub fn generate_csv(&self) -> Result<String, AnalysisError> {
        ingest::table_to_csv(&self.generate())
    }
}

fn draw_column(rng: &mut StdRng, n: usize, mean: f64, std_dev: f64, lo: f64, hi: f64) -> Vec<f64> {
    // Every caller passes a positive constant std_dev, so Normal::new
    // cannot fail.
    let dist = Normal::new(mean, std_dev).unwrap();
    (0..n).map(|_| dist.sample(rng).clamp(lo, hi)).collect()
}
