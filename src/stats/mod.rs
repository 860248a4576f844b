//! Outlier-robust summary statistics.
//!
//! Line heights within one page are mostly consistent, but a handful of
//! lines (titles, marginalia, merged lines) can be far off. Outliers are
//! rejected with the modified Z-score (Iglewicz and Hoaglin), which is based
//! on the median absolute deviation and tolerates heavy tails.

/// Modified Z-score above which a value is treated as an outlier.
pub const OUTLIER_THRESHOLD: f64 = 3.5;

/// Scale factor of the modified Z-score (0.75 quantile of the standard normal).
pub const MODIFIED_Z_SCALE: f64 = 0.6745;

/// Lower bound for the median absolute deviation.
pub const MAD_EPSILON: f64 = 1e-10;

/// Samples of this size or smaller are used as-is, without outlier rejection.
pub const MIN_SAMPLES_FOR_REJECTION: usize = 3;

/// Summary of a sample after outlier rejection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RobustStats {
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub median: f64,
    /// Number of values that survived outlier rejection.
    pub retained: usize,
    /// Size of the input sample.
    pub total: usize,
}

/// Compute mean, standard deviation and median over the non-outlier values.
///
/// Returns `None` for an empty sample.
pub fn robust_stats(sample: &[f64]) -> Option<RobustStats> {
    let retained: Vec<f64> = if sample.len() > MIN_SAMPLES_FOR_REJECTION {
        sample
            .iter()
            .zip(outlier_mask(sample))
            .filter(|(_, is_outlier)| !is_outlier)
            .map(|(value, _)| *value)
            .collect()
    } else {
        sample.to_vec()
    };

    if retained.is_empty() {
        return None;
    }

    let n = retained.len() as f64;
    let mean = retained.iter().sum::<f64>() / n;
    let variance = retained.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let median = median(&retained)?;

    Some(RobustStats {
        mean,
        std: variance.sqrt(),
        median,
        retained: retained.len(),
        total: sample.len(),
    })
}

/// Flag each value whose modified Z-score exceeds [`OUTLIER_THRESHOLD`].
pub fn outlier_mask(sample: &[f64]) -> Vec<bool> {
    let Some(center) = median(sample) else {
        return Vec::new();
    };

    let diffs: Vec<f64> = sample.iter().map(|v| (v - center).abs()).collect();
    let mad = median(&diffs).unwrap_or(0.0).max(MAD_EPSILON);

    diffs
        .iter()
        .map(|diff| MODIFIED_Z_SCALE * diff / mad > OUTLIER_THRESHOLD)
        .collect()
}

/// Median of a sample; the mean of the two middle values for even sizes.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
