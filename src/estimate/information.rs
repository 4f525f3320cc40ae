//! Information-retention heuristics: entropy and total variation.
//!
//! Both grow the fixed-point fit one point at a time and stop at the first
//! count whose reconstruction keeps the required share of the original
//! signal's information measure.

use super::EstimationResult;
use crate::fit::{approximate_with_fixed_points, reconstruct};
use crate::geom::{bin_count, histogram_entropy, total_variation, value_range, EPSILON};
use crate::Sample;

const ENTROPY_RETENTION: f64 = 0.95;
const VARIATION_RETENTION: f64 = 0.9;

/// Smallest count keeping 95% of the value-histogram entropy.
pub(super) fn estimate_entropy(data: &[Sample], lo: usize, hi: usize) -> EstimationResult {
    let values: Vec<f64> = data.iter().map(|s| s.value).collect();
    let (vmin, vmax) = value_range(&values);
    let bins = bin_count(values.len());
    let measure = |v: &[f64]| histogram_entropy(v, vmin, vmax, bins);

    retention_search("entropy", data, lo, hi, ENTROPY_RETENTION, measure)
        .metric("bins", bins as f64)
}

/// Smallest count keeping 90% of the total variation.
pub(super) fn estimate_total_variation(data: &[Sample], lo: usize, hi: usize) -> EstimationResult {
    retention_search("total_variation", data, lo, hi, VARIATION_RETENTION, total_variation)
}

fn retention_search(
    name: &'static str,
    data: &[Sample],
    lo: usize,
    hi: usize,
    share: f64,
    measure: impl Fn(&[f64]) -> f64,
) -> EstimationResult {
    let values: Vec<f64> = data.iter().map(|s| s.value).collect();
    let original = measure(&values);

    if original < EPSILON {
        return EstimationResult::new(name, lo, 1.0)
            .metric("original", original)
            .metric("fitted", original)
            .metric("retention", 1.0);
    }

    let mut last = (hi, 0.0);
    for n in lo..=hi {
        let fitted = measure(&reconstruct(&approximate_with_fixed_points(data, n), data));
        last = (n, fitted);
        if fitted >= share * original {
            break;
        }
    }

    let (recommended, fitted) = last;
    let retention = fitted / original;
    EstimationResult::new(name, recommended, retention)
        .metric("original", original)
        .metric("fitted", fitted)
        .metric("retention", retention)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::tests::wave;

    fn flat(n: usize) -> Vec<Sample> {
        (0..n).map(|i| Sample::new(i as f64, 3.0)).collect()
    }

    #[test]
    fn flat_signal_needs_the_minimum() {
        assert_eq!(estimate_entropy(&flat(30), 2, 20).recommended_points, 2);
        assert_eq!(estimate_total_variation(&flat(30), 2, 20).recommended_points, 2);
    }

    #[test]
    fn found_count_meets_retention_share() {
        let data = wave(300);
        for r in [estimate_entropy(&data, 2, 60), estimate_total_variation(&data, 2, 60)] {
            assert!(r.recommended_points < 60, "{}", r.method);
            let share = if r.method == "entropy" { ENTROPY_RETENTION } else { VARIATION_RETENTION };
            assert!(r.metrics["retention"] >= share, "{}", r.method);
            assert_eq!(r.score, r.metrics["retention"]);
        }
    }

    #[test]
    fn unreachable_share_returns_upper_bound() {
        // Alternating signal: few points cannot keep its variation.
        let data: Vec<Sample> = (0..100)
            .map(|i| Sample::new(i as f64, if i % 2 == 0 { 1.0 } else { -1.0 }))
            .collect();
        let r = estimate_total_variation(&data, 2, 8);
        assert_eq!(r.recommended_points, 8);
        assert!(r.metrics["retention"] < VARIATION_RETENTION);
    }

    #[test]
    fn entropy_reports_bin_count() {
        let r = estimate_entropy(&wave(300), 2, 50);
        assert_eq!(r.metrics["bins"], 20.0);
    }
}
