//! Per-sample importance scores.
//!
//! Four components are computed for every sample, each normalised by its
//! maximum over the sequence so they land in [0, 1]:
//! curvature (turning angle), change rate (|slope|), local variance
//! (±2 sample window) and extremeness (|value - mean|). The weighted sum
//! with normalised [`ImportanceWeights`] is the sample's score.

use crate::config::ImportanceWeights;
use crate::geom::{mean, slope_at, to_point, turning_angle, EPSILON};
use crate::Sample;

/// Half-width of the window used for the local variance component.
const VARIANCE_HALF_WINDOW: usize = 2;

/// Importance score in [0, 1] for every sample.
pub fn scores(samples: &[Sample], weights: &ImportanceWeights) -> Vec<f64> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }
    let w = weights.normalized();

    let curvature = normalize(curvature(samples));
    let change_rate = normalize((0..n).map(|i| slope_at(samples, i).abs()).collect());
    let variance = normalize(local_variance(samples));
    let extremeness = normalize(extremeness(samples));

    (0..n)
        .map(|i| {
            w.curvature * curvature[i]
                + w.change_rate * change_rate[i]
                + w.local_variance * variance[i]
                + w.extreme_value * extremeness[i]
        })
        .collect()
}

/// RDP deviation multipliers from importance scores.
///
/// Samples scoring at or below `threshold` keep their raw deviation; more
/// important samples have it scaled by `score / threshold`.
pub fn rdp_factors(scores: &[f64], threshold: f64) -> Vec<f64> {
    let threshold = threshold.max(EPSILON);
    scores.iter().map(|&s| (s / threshold).max(1.0)).collect()
}

fn curvature(samples: &[Sample]) -> Vec<f64> {
    let n = samples.len();
    (0..n)
        .map(|i| {
            if i == 0 || i + 1 == n {
                0.0
            } else {
                turning_angle(
                    to_point(samples[i - 1]),
                    to_point(samples[i]),
                    to_point(samples[i + 1]),
                )
            }
        })
        .collect()
}

fn local_variance(samples: &[Sample]) -> Vec<f64> {
    let n = samples.len();
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(VARIANCE_HALF_WINDOW);
            let hi = (i + VARIANCE_HALF_WINDOW + 1).min(n);
            let window: Vec<f64> = samples[lo..hi].iter().map(|s| s.value).collect();
            let m = mean(&window);
            window.iter().map(|v| (v - m).powi(2)).sum::<f64>() / window.len() as f64
        })
        .collect()
}

fn extremeness(samples: &[Sample]) -> Vec<f64> {
    let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
    let m = mean(&values);
    values.iter().map(|v| (v - m).abs()).collect()
}

/// Divide by the maximum; an all-zero component stays zero.
fn normalize(mut values: Vec<f64>) -> Vec<f64> {
    let max = values.iter().cloned().fold(0.0f64, f64::max);
    if max > EPSILON {
        for v in &mut values {
            *v /= max;
        }
    } else {
        values.iter_mut().for_each(|v| *v = 0.0);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<Sample> {
        (0..n).map(|i| Sample::new(i as f64, i as f64 * 0.5)).collect()
    }

    #[test]
    fn scores_are_unit_bounded() {
        let samples: Vec<Sample> = (0..40)
            .map(|i| Sample::new(i as f64 * 0.1, (i as f64 * 0.3).sin() * 3.0))
            .collect();
        for s in scores(&samples, &ImportanceWeights::SENSOR) {
            assert!((0.0..=1.0 + 1e-12).contains(&s), "score {s}");
        }
    }

    #[test]
    fn spike_outranks_flat_neighbours() {
        let mut samples: Vec<Sample> = (0..21).map(|i| Sample::new(i as f64, 0.0)).collect();
        samples[10].value = 5.0;
        let shape = ImportanceWeights::new(1.0, 0.0, 0.0, 1.0).unwrap();
        let sc = scores(&samples, &shape);
        let best = sc
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
        assert_eq!(best.0, 10);
        assert!(sc[0] < sc[10]);
    }

    #[test]
    fn flat_signal_scores_zero() {
        let samples: Vec<Sample> = (0..10).map(|i| Sample::new(i as f64, 2.0)).collect();
        assert!(scores(&samples, &ImportanceWeights::EVEN).iter().all(|&s| s == 0.0));
        assert!(scores(&[], &ImportanceWeights::EVEN).is_empty());
    }

    #[test]
    fn ramp_has_no_curvature() {
        let only_curvature = ImportanceWeights::new(1.0, 0.0, 0.0, 0.0).unwrap();
        assert!(scores(&ramp(12), &only_curvature).iter().all(|&s| s.abs() < 1e-6));
    }

    #[test]
    fn factors_only_boost_above_threshold() {
        let f = rdp_factors(&[0.0, 0.25, 0.5, 1.0], 0.5);
        assert_eq!(f, vec![1.0, 1.0, 1.0, 2.0]);
    }
}
