use rayon::prelude::*;

use super::{fit_errors, EstimationResult};
use crate::geom::EPSILON;
use crate::Sample;

const NAME: &str = "elbow";

/// Point of sharpest diminishing returns on the MSE-vs-count curve.
///
/// Recommends `lo + argmax |second difference|`. A flat error curve
/// (no bend at all) recommends `lo`.
pub(super) fn estimate(data: &[Sample], lo: usize, hi: usize) -> EstimationResult {
    let errors: Vec<f64> = (lo..=hi)
        .into_par_iter()
        .map(|n| fit_errors(data, n).mse)
        .collect();

    if errors.len() < 3 {
        return EstimationResult::new(NAME, lo, 0.0)
            .metric("candidates", errors.len() as f64)
            .metric("mse_at_recommended", errors.first().copied().unwrap_or(0.0));
    }

    let bends: Vec<f64> = errors
        .windows(3)
        .map(|w| (w[2] - 2.0 * w[1] + w[0]).abs())
        .collect();
    let (mut best, mut best_bend) = (0usize, 0.0f64);
    for (i, &b) in bends.iter().enumerate() {
        if b > best_bend {
            best = i;
            best_bend = b;
        }
    }

    let scale = errors.iter().cloned().fold(0.0f64, f64::max).max(1.0);
    let offset = if best_bend <= EPSILON * scale { 0 } else { best };
    let recommended = lo + offset;

    EstimationResult::new(NAME, recommended, best_bend)
        .metric("candidates", errors.len() as f64)
        .metric("max_second_derivative", best_bend)
        .metric("mse_at_recommended", errors[offset])
        .metric("mse_at_min", errors[0])
}
