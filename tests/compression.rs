//! End-to-end behaviour through the public API.

use curvepress::fit::approximate_with_fixed_points;
use curvepress::simplify::{simplify, simplify_points};
use curvepress::{
    compress, compress_with_curve, importance_scores, CompressionMethod, CompressionParams,
    ControlPointEstimator, CurveError, DataType, ErrorStats, ImportanceWeights, Sample, SegmentKind,
};

fn samples(pairs: &[(f64, f64)]) -> Vec<Sample> {
    pairs.iter().map(|&p| Sample::from(p)).collect()
}

fn channel(n: usize) -> Vec<Sample> {
    (0..n)
        .map(|i| {
            let t = i as f64 / 60.0;
            let v = (t * 2.0).sin() + 0.25 * (t * 9.0).sin() + if t > 2.0 { 0.4 } else { 0.0 };
            Sample::new(t, v)
        })
        .collect()
}

fn noisy_sine(n: usize) -> Vec<Sample> {
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64 * std::f64::consts::TAU;
            let jitter = ((i * 104_729) % 17) as f64 / 17.0 - 0.5;
            Sample::new(t, t.sin() + 0.003 * jitter)
        })
        .collect()
}

/// Rise over samples 0..=100, hold until 200, fall back to 0 at 300.
fn trapezoid() -> Vec<Sample> {
    (0..=300)
        .map(|i| {
            let v = match i {
                0..=100 => i as f64 / 100.0,
                101..=200 => 1.0,
                _ => (300 - i) as f64 / 100.0,
            };
            Sample::new(i as f64, v)
        })
        .collect()
}

fn fixed_point_error(data: &[Sample], n: usize) -> f64 {
    ErrorStats::discrete(data, &approximate_with_fixed_points(data, n)).max_abs
}

#[test]
fn triangle_keeps_peak_until_tolerance_exceeds_height() {
    let tri = samples(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
    assert_eq!(simplify_points(&tri, 0.5, None).len(), 3);
    assert_eq!(
        simplify_points(&tri, 2.0, None),
        samples(&[(0.0, 0.0), (2.0, 0.0)])
    );
}

#[test]
fn configuration_errors_fail_fast() {
    assert_eq!(
        CompressionParams::new(0.0, CompressionMethod::RdpLinear, DataType::Animation),
        Err(CurveError::InvalidTolerance(0.0))
    );
    assert!(CompressionParams::new(1.5, CompressionMethod::RdpLinear, DataType::Animation).is_err());
    assert_eq!(
        CompressionParams::default().with_importance_threshold(-0.5),
        Err(CurveError::InvalidImportanceThreshold(-0.5))
    );
}

#[test]
fn compression_ratio_is_exact_for_every_method() {
    let data = channel(400);
    for method in CompressionMethod::ALL {
        let params = CompressionParams::new(0.01, method, DataType::Animation).unwrap();
        let result = compress(&data, &params).unwrap();
        let expected = result.compressed_count() as f64 / result.original_count() as f64;
        assert_eq!(result.compression_ratio(), expected, "{method}");
        assert!(result.mean_error() <= result.max_error());
    }
}

#[test]
fn curves_are_exact_at_segment_boundaries() {
    let data = channel(300);
    for method in CompressionMethod::ALL {
        let mut params = CompressionParams::new(0.02, method, DataType::Sensor).unwrap();
        // Four control points would switch B-splines to the approximating cubic basis.
        params.set_point_count(Some(7));
        let (curve, _) = compress_with_curve(&data, &params).unwrap();
        for seg in curve.segments() {
            assert!((curve.evaluate(seg.start_time()) - seg.start_value()).abs() < 1e-9, "{method}");
            assert!((seg.evaluate(seg.end_time()) - seg.end_value()).abs() < 1e-9, "{method}");
        }
    }
}

#[test]
fn resampling_at_breakpoints_is_idempotent() {
    let data = channel(250);
    let curve = simplify(&data, 0.01, SegmentKind::Bezier, None).unwrap();
    let keys = curve.breakpoints();
    let again = curve.sample_at(keys.iter().map(|k| k.time));
    for (k, r) in keys.iter().zip(&again) {
        assert!((k.value - r.value).abs() < 1e-5);
    }
}

#[test]
fn rdp_point_count_shrinks_as_tolerance_grows() {
    let data = channel(500);
    let tolerances = [0.0005, 0.001, 0.004, 0.01, 0.03, 0.1, 0.3];
    let counts: Vec<usize> = tolerances
        .iter()
        .map(|&t| simplify_points(&data, t, None).len())
        .collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{counts:?}");
}

#[test]
fn fixed_point_fit_has_requested_cardinality() {
    let data = channel(90);
    for n in 2..=90 {
        assert_eq!(approximate_with_fixed_points(&data, n).len(), n);
    }
}

#[test]
fn linear_ramp_elbow_is_minimal() {
    let ramp: Vec<Sample> = (0..100).map(|i| Sample::new(i as f64, 0.5 * i as f64 - 3.0)).collect();
    let r = ControlPointEstimator::new(2, 50).estimate_by_elbow_method(&ramp, 0.01);
    assert!(r.recommended_points <= 3, "got {}", r.recommended_points);
}

#[test]
fn error_bound_on_noisy_sine_is_tight() {
    let data = noisy_sine(600);
    let tol = 0.01;
    let r = ControlPointEstimator::default().determine_by_error_bound(&data, tol);
    let n = r.recommended_points;
    let error_at = |k: usize| fixed_point_error(&data, k);
    assert!(error_at(n) <= tol, "max error {} at {}", error_at(n), n);
    assert!(n == 2 || error_at(n - 1) > tol, "{} points is not minimal", n);
}

#[test]
fn estimator_verdicts_feed_back_into_direct_fitting() {
    let data = channel(300);
    let verdict = ControlPointEstimator::default().determine_by_error_bound(&data, 0.02);
    let params = CompressionParams::new(0.02, CompressionMethod::BezierDirect, DataType::Animation)
        .unwrap()
        .with_point_count(verdict.recommended_points);
    let result = compress(&data, &params).unwrap();
    assert_eq!(result.compressed_count(), verdict.recommended_points);
    assert!(result.compression_ratio() < 1.0);
}

#[test]
fn error_bound_on_trapezoid_meets_tolerance_without_being_minimal() {
    // Picks land on both corners only when n - 1 is a multiple of 3, so
    // fit error is not monotone in n and the binary search can skip past
    // the exact 4-point fit.
    let data = trapezoid();
    let tol = 0.01;
    let r = ControlPointEstimator::default().determine_by_error_bound(&data, tol);
    assert_eq!(r.metrics["satisfied"], 1.0);
    assert_eq!(r.recommended_points, 49);
    assert!(fixed_point_error(&data, 49) <= tol);
    assert!(fixed_point_error(&data, 48) > tol);
    assert!(fixed_point_error(&data, 39) > tol);
    assert!(fixed_point_error(&data, 4) < 1e-12);
}

#[test]
fn importance_scores_single_out_a_spike() {
    let mut data: Vec<Sample> = (0..21).map(|i| Sample::new(i as f64, 0.0)).collect();
    data[10].value = 5.0;
    let shape = ImportanceWeights::new(1.0, 0.0, 0.0, 1.0).unwrap();
    let scores = importance_scores(&data, &shape);
    assert_eq!(scores.len(), data.len());
    let top = scores
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i);
    assert_eq!(top, Some(10));
    // Sharpest turn and furthest from the mean: both components peak here.
    assert!((scores[10] - 1.0).abs() < 1e-12);
    assert!(scores[0] < 0.1);
}
