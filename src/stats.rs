//! Summary statistics for the cleaning passes
//!
//! Percentiles use linear interpolation between order statistics
//! (rank `p * (n - 1)`), the convention the outlier fences are
//! specified against. Aggregates over empty input are `None`.

/// Fence half-width in IQR units. 1.5 is the standard Tukey multiplier.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Arithmetic mean, `None` for empty input.
pub fn mean(data: &[f64]) -> Option<f64> {
    let count = data.len() as f64;
    if count > 0.0 {
        let sum: f64 = data.iter().sum();
        Some(sum / count)
    } else {
        None
    }
}

/// Interpolated percentile of `data` at `pct` in `[0, 1]`.
///
/// Non-finite values are ignored; `None` when nothing remains.
pub fn percentile(data: &[f64], pct: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let pct = pct.clamp(0.0, 1.0);
    let rank = pct * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Inclusive keep-interval `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]` for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fences {
    pub lower: f64,
    pub upper: f64,
}

impl Fences {
    /// Compute fences over the given values, `None` for empty input.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let q1 = percentile(values, 0.25)?;
        let q3 = percentile(values, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            lower: q1 - IQR_MULTIPLIER * iqr,
            upper: q3 + IQR_MULTIPLIER * iqr,
        })
    }

    /// True when `value` lies inside the fences (bounds inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn mean_basic() {
        let m = mean(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((m - 2.5).abs() < 1e-12);
    }

    #[test]
    fn percentile_interpolates_between_order_statistics() {
        let data = [1.0, 2.0, 3.0, 4.0];
        // rank 0.25 * 3 = 0.75 -> 1 + 0.75 * (2 - 1)
        assert!((percentile(&data, 0.25).unwrap() - 1.75).abs() < 1e-12);
        assert!((percentile(&data, 0.5).unwrap() - 2.5).abs() < 1e-12);
        assert!((percentile(&data, 0.75).unwrap() - 3.25).abs() < 1e-12);
    }

    #[test]
    fn percentile_handles_edges() {
        let data = [3.0, 1.0, 2.0];
        assert_eq!(percentile(&data, 0.0), Some(1.0));
        assert_eq!(percentile(&data, 1.0), Some(3.0));
        assert_eq!(percentile(&[5.0], 0.25), Some(5.0));
        assert_eq!(percentile(&[], 0.5), None);
    }

    #[test]
    fn percentile_ignores_non_finite_values() {
        let data = [1.0, f64::NAN, 2.0, 3.0, f64::INFINITY, 4.0];
        assert!((percentile(&data, 0.75).unwrap() - 3.25).abs() < 1e-12);
    }

    #[test]
    fn fences_from_quartiles() {
        let fences = Fences::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        // Q1 = 1.75, Q3 = 3.25, IQR = 1.5
        assert!((fences.lower - (-0.5)).abs() < 1e-12);
        assert!((fences.upper - 5.5).abs() < 1e-12);

        assert!(fences.contains(fences.lower));
        assert!(fences.contains(fences.upper));
        assert!(fences.contains(2.0));
        assert!(!fences.contains(-0.6));
        assert!(!fences.contains(5.6));
    }

    #[test]
    fn identical_values_give_degenerate_fences() {
        let fences = Fences::from_values(&[7.0, 7.0, 7.0]).unwrap();
        assert_eq!(fences.lower, 7.0);
        assert_eq!(fences.upper, 7.0);
        assert!(fences.contains(7.0));
        assert!(!fences.contains(7.1));
    }
}
