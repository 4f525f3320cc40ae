//! Upper-bound heuristics: error-bound search and SNR estimate.

use log::warn;

use super::{fit_errors, EstimationResult};
use crate::geom::std_dev;
use crate::Sample;

/// Hard ceiling on either bound.
const MAX_BOUND: usize = 200;
/// Floor of the statistical recommendation.
const STATISTICAL_BASE: f64 = 10.0;
const SNR_GAIN: f64 = 5.0;
const NOISE_EPSILON: f64 = 1e-10;

/// Largest count either bound may recommend: `min(len / 2, 200)`, at least 2.
fn ceiling(len: usize) -> usize {
    (len / 2).min(MAX_BOUND).max(2)
}

/// Binary search for the smallest count whose fixed-point fit has max
/// absolute error within `tolerance`. Assumes error falls as the count
/// grows. If even the ceiling misses, the ceiling is returned.
pub(super) fn error_bound(data: &[Sample], tolerance: f64) -> EstimationResult {
    let upper = ceiling(data.len());
    let mut lo = 2usize;
    let mut hi = upper;
    let mut evaluations = 0usize;

    let upper_error = fit_errors(data, upper).max_abs;
    evaluations += 1;
    let satisfied = upper_error <= tolerance;
    if !satisfied {
        warn!(
            "error bound: {} points still miss tolerance {} (max error {:.6})",
            upper, tolerance, upper_error
        );
    } else {
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            evaluations += 1;
            if fit_errors(data, mid).max_abs <= tolerance {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
    }

    let recommended = if satisfied { lo } else { upper };
    let max_error = if recommended == upper {
        upper_error
    } else {
        fit_errors(data, recommended).max_abs
    };

    EstimationResult::new("error_bound", recommended, max_error)
        .metric("max_error", max_error)
        .metric("upper_limit", upper as f64)
        .metric("satisfied", if satisfied { 1.0 } else { 0.0 })
        .metric("evaluations", evaluations as f64)
}

/// `clamp(round(10 + 5 * SNR), 10, min(len / 2, 200))`, where SNR is the
/// value spread over the spread of first differences.
pub(super) fn statistical(data: &[Sample]) -> EstimationResult {
    let values: Vec<f64> = data.iter().map(|s| s.value).collect();
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let signal = std_dev(&values);
    let noise = std_dev(&diffs);
    let snr = signal / (noise + NOISE_EPSILON);

    let raw = (STATISTICAL_BASE + snr * SNR_GAIN).round();
    let raw = if raw.is_finite() { raw as usize } else { usize::MAX };
    // A ceiling under the base wins: never recommend more than len / 2.
    let recommended = raw.max(STATISTICAL_BASE as usize).min(ceiling(data.len()));

    EstimationResult::new("statistical", recommended, snr)
        .metric("snr", snr)
        .metric("std_dev", signal)
        .metric("noise_floor", noise)
}
