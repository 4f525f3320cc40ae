use rayon::prelude::*;

use super::EstimationResult;
use crate::geom::lerp;
use crate::simplify::rdp_indices;
use crate::Sample;

const NAME: &str = "douglas_peucker";

/// Number of log-spaced tolerances probed.
const PROBES: usize = 20;
/// Probes span `[tolerance / SPREAD, tolerance * SPREAD]`.
const SPREAD: f64 = 10.0;

/// Run plain RDP across a log-spaced tolerance sweep and read the point
/// count at the target tolerance off the log-log curve.
pub(super) fn estimate(data: &[Sample], tolerance: f64, lo: usize, hi: usize) -> EstimationResult {
    let log_lo = (tolerance / SPREAD).ln();
    let log_hi = (tolerance * SPREAD).ln();
    let probes: Vec<(f64, f64)> = (0..PROBES)
        .into_par_iter()
        .map(|i| {
            let log_tol = lerp(log_lo, log_hi, i as f64 / (PROBES - 1) as f64);
            let count = rdp_indices(data, log_tol.exp(), None).len().max(1);
            (log_tol, (count as f64).ln())
        })
        .collect();

    let interpolated = interpolate_log_log(&probes, tolerance.ln()).exp();
    let recommended = (interpolated.round() as usize).clamp(lo, hi);

    let first = probes.first().map_or(0.0, |p| p.1.exp());
    let last = probes.last().map_or(0.0, |p| p.1.exp());
    EstimationResult::new(NAME, recommended, interpolated)
        .metric("interpolated_points", interpolated)
        .metric("points_at_min_tolerance", first.round())
        .metric("points_at_max_tolerance", last.round())
}

/// Piecewise-linear interpolation over `(ln tolerance, ln count)` pairs
/// sorted by tolerance, clamped at the ends.
fn interpolate_log_log(probes: &[(f64, f64)], x: f64) -> f64 {
    let (first, last) = match (probes.first(), probes.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return 0.0,
    };
    if x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }
    let hi = probes.partition_point(|p| p.0 < x);
    let (a, b) = (probes[hi - 1], probes[hi]);
    let t = (x - a.0) / (b.0 - a.0);
    lerp(a.1, b.1, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::tests::{ramp, wave};

    #[test]
    fn straight_line_collapses_to_endpoints() {
        let r = estimate(&ramp(100), 0.01, 2, 50);
        assert_eq!(r.recommended_points, 2);
        assert!((r.metrics["interpolated_points"] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn tighter_tolerance_needs_more_points() {
        let data = wave(400);
        let loose = estimate(&data, 0.2, 2, 400);
        let tight = estimate(&data, 0.005, 2, 400);
        assert!(tight.recommended_points >= loose.recommended_points);
        assert!(r_between(&tight));
    }

    fn r_between(r: &EstimationResult) -> bool {
        let slack = 1e-9;
        r.metrics["points_at_min_tolerance"] + slack >= r.score
            && r.score + slack >= r.metrics["points_at_max_tolerance"]
    }

    #[test]
    fn log_log_interpolation_is_linear_in_logs() {
        let probes = [(0.0, 0.0), (1.0, 2.0)];
        assert!((interpolate_log_log(&probes, 0.25) - 0.5).abs() < 1e-12);
        assert_eq!(interpolate_log_log(&probes, -3.0), 0.0);
        assert_eq!(interpolate_log_log(&probes, 3.0), 2.0);
    }
}
