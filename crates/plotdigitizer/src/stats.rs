//! Outlier rejection and power-domain median on digitized samples.

use crate::types::DataPoint;

/// Median of an empty sample set was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedianError {
    Empty,
}

impl std::fmt::Display for MedianError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "median of an empty sample set"),
        }
    }
}

impl std::error::Error for MedianError {}

/// Percentile with linear interpolation between closest ranks.
///
/// `sorted` must be ascending and non-empty; `q` is in `[0, 100]`.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = q / 100.0 * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn fences(values: impl Iterator<Item = f64>, k: f64) -> (f64, f64) {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(f64::total_cmp);
    let q1 = percentile(&v, 25.0);
    let q3 = percentile(&v, 75.0);
    let iqr = q3 - q1;
    (q1 - k * iqr, q3 + k * iqr)
}

/// Keep the samples whose `x` and `y` both lie inside the
/// `[Q1 − k·IQR, Q3 + k·IQR]` fences of their axis. Order is preserved.
pub fn remove_outliers(points: &[DataPoint], k: f64) -> Vec<DataPoint> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let (x_lo, x_hi) = fences(points.iter().map(|p| p.x), k);
    let (y_lo, y_hi) = fences(points.iter().map(|p| p.y), k);
    let kept: Vec<DataPoint> = points
        .iter()
        .copied()
        .filter(|p| p.x >= x_lo && p.x <= x_hi && p.y >= y_lo && p.y <= y_hi)
        .collect();
    tracing::debug!(
        before = points.len(),
        after = kept.len(),
        "outlier filter"
    );
    kept
}

/// Median of decibel values taken in the linear power domain:
/// `10·log10(median(10^(y/10)))`.
pub fn power_median_db(values_db: &[f64]) -> Result<f64, MedianError> {
    if values_db.is_empty() {
        return Err(MedianError::Empty);
    }
    let mut linear: Vec<f64> = values_db.iter().map(|db| 10f64.powf(db / 10.0)).collect();
    linear.sort_by(f64::total_cmp);
    let n = linear.len();
    let median = if n % 2 == 1 {
        linear[n / 2]
    } else {
        0.5 * (linear[n / 2 - 1] + linear[n / 2])
    };
    Ok(10.0 * median.log10())
}
