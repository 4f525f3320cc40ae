use super::EstimationResult;
use crate::geom::{to_point, turning_angle, EPSILON};
use crate::Sample;

const NAME: &str = "curvature";

/// Share of total turning angle to cover with significant points.
const MASS_SHARE: f64 = 0.9;
/// Control points granted per significant point.
const POINTS_PER_SIGNIFICANT: f64 = 0.5;

/// Count the sharpest turns that carry 90% of the curvature mass.
pub(super) fn estimate(data: &[Sample], lo: usize, hi: usize) -> EstimationResult {
    let mut angles: Vec<f64> = data
        .windows(3)
        .map(|w| turning_angle(to_point(w[0]), to_point(w[1]), to_point(w[2])))
        .collect();
    let total: f64 = angles.iter().sum();
    let mean = total / angles.len().max(1) as f64;

    if total < EPSILON {
        return EstimationResult::new(NAME, lo, 0.0)
            .metric("total_curvature", 0.0)
            .metric("significant_points", 0.0)
            .metric("mean_curvature", 0.0);
    }

    angles.sort_unstable_by(|a, b| b.total_cmp(a));
    let target = MASS_SHARE * total;
    let mut covered = 0.0;
    let mut significant = 0usize;
    for a in &angles {
        covered += a;
        significant += 1;
        if covered >= target {
            break;
        }
    }

    let recommended = ((significant as f64 * POINTS_PER_SIGNIFICANT).round() as usize + lo).clamp(lo, hi);

    EstimationResult::new(NAME, recommended, total)
        .metric("total_curvature", total)
        .metric("significant_points", significant as f64)
        .metric("mean_curvature", mean)
}
