//! curvepress: dense scalar signals → compact piecewise curves.
//!
//! Compresses time-ordered samples (animation channels, sensor traces,
//! price series) into linear, B-spline or Hermite segments that
//! reconstruct the signal within a bounded error, and estimates how many
//! control points a signal needs for a given tolerance.
//!
//! # Example
//!
//! ```
//! use curvepress::{compress, CompressionMethod, CompressionParams, DataType, Sample};
//!
//! let samples: Vec<Sample> = (0..100)
//!     .map(|i| Sample::new(i as f64 * 0.1, (i as f64 * 0.1).sin()))
//!     .collect();
//! let params = CompressionParams::new(0.01, CompressionMethod::RdpBezier, DataType::Animation)?;
//! let result = compress(&samples, &params)?;
//! assert!(result.compressed_count() < samples.len());
//! # Ok::<(), curvepress::CurveError>(())
//! ```

#![forbid(unsafe_code)]

mod geom;
mod importance;

pub mod config;
pub mod curve;
pub mod error;
pub mod estimate;
pub mod fit;
pub mod result;
pub mod segment;
pub mod simplify;

pub use config::{CompressionMethod, CompressionParams, DataType, ImportanceWeights};
pub use curve::CompressedCurveData;
pub use error::CurveError;
pub use estimate::{consensus, ControlPointEstimator, EstimationResult, Heuristic};
pub use result::{CompressionResult, ErrorStats};
pub use segment::{CurveSegment, SegmentKind};

use std::time::Instant;

use log::debug;
use serde::{Deserialize, Serialize};

/// One raw observation. Sequences must be sorted by ascending time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

impl Sample {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

impl From<(f64, f64)> for Sample {
    fn from((time, value): (f64, f64)) -> Self {
        Self::new(time, value)
    }
}

/// Per-sample importance scores in [0, 1] for the given weights.
pub fn importance_scores(samples: &[Sample], weights: &ImportanceWeights) -> Vec<f64> {
    importance::scores(samples, weights)
}

/// Build the compressed curve for `samples` with the configured method.
///
/// Fewer than two distinct sample times give an empty curve.
pub fn compress_curve(
    samples: &[Sample],
    params: &CompressionParams,
) -> Result<CompressedCurveData, CurveError> {
    if samples.len() < 2 {
        return Ok(CompressedCurveData::empty());
    }
    let method = params.method();
    let tolerance = params.tolerance();

    let kind = match method {
        CompressionMethod::RdpLinear => SegmentKind::Linear,
        CompressionMethod::RdpBSpline | CompressionMethod::BSplineDirect => SegmentKind::BSpline,
        CompressionMethod::RdpBezier | CompressionMethod::BezierDirect => SegmentKind::Bezier,
    };

    let curve = if method.is_direct() {
        let n = params.point_count().unwrap_or_else(|| {
            ControlPointEstimator::default()
                .determine_by_error_bound(samples, tolerance)
                .recommended_points
        });
        if kind == SegmentKind::BSpline {
            fit::fit_bspline(samples, n)?
        } else {
            fit::fit_bezier(samples, n)?
        }
    } else {
        let scores = importance::scores(samples, params.weights());
        let factors = importance::rdp_factors(&scores, params.importance_threshold());
        simplify::simplify(samples, tolerance, kind, Some(&factors))?
    };

    debug!(
        "{}: {} samples \u{2192} {} segments ({} keys)",
        method,
        samples.len(),
        curve.segment_count(),
        curve.point_count()
    );
    Ok(curve)
}

/// Compress `samples` and measure the result against them.
///
/// When no curve can be built (a single sample, or every sample at one
/// time) the result describes a single flat value.
pub fn compress(samples: &[Sample], params: &CompressionParams) -> Result<CompressionResult, CurveError> {
    compress_with_curve(samples, params).map(|(_, result)| result)
}

/// [`compress`], also handing back the curve itself.
pub fn compress_with_curve(
    samples: &[Sample],
    params: &CompressionParams,
) -> Result<(CompressedCurveData, CompressionResult), CurveError> {
    let t_start = Instant::now();
    let curve = compress_curve(samples, params)?;
    let result = if curve.is_empty() {
        CompressionResult::from_samples(samples, &samples[..samples.len().min(1)])
    } else {
        CompressionResult::from_curve(samples, &curve)
    };
    Ok((curve, result.with_elapsed(t_start.elapsed())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(n: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| {
                let t = i as f64 / 30.0;
                Sample::new(t, (t * 3.0).sin() * 0.8 + 0.1 * (t * 11.0).cos())
            })
            .collect()
    }

    #[test]
    fn every_method_compresses() {
        let data = signal(300);
        for method in CompressionMethod::ALL {
            let params = CompressionParams::new(0.02, method, DataType::Sensor).unwrap();
            let result = compress(&data, &params).unwrap();
            assert_eq!(result.original_count(), 300);
            assert!(result.compressed_count() >= 2, "{method}");
            assert!(result.compressed_count() < 300, "{method}");
            assert!(result.elapsed().is_some());
        }
    }

    #[test]
    fn direct_methods_honour_point_count() {
        let data = signal(200);
        let params = CompressionParams::new(0.05, CompressionMethod::BezierDirect, DataType::Animation)
            .unwrap()
            .with_point_count(9);
        assert_eq!(compress(&data, &params).unwrap().compressed_count(), 9);
    }

    #[test]
    fn direct_methods_default_to_error_bound() {
        let data = signal(200);
        let params = CompressionParams::new(0.01, CompressionMethod::BSplineDirect, DataType::Animation).unwrap();
        let curve = compress_curve(&data, &params).unwrap();
        let expected = ControlPointEstimator::default()
            .determine_by_error_bound(&data, 0.01)
            .recommended_points;
        assert_eq!(curve.point_count(), expected);
    }

    #[test]
    fn single_sample_is_a_flat_value() {
        let data = [Sample::new(1.0, 4.0)];
        let result = compress(&data, &CompressionParams::default()).unwrap();
        assert_eq!(result.compressed_count(), 1);
        assert_eq!(result.max_error(), 0.0);
        assert_eq!(compress(&[], &CompressionParams::default()).unwrap().original_count(), 0);
    }

    #[test]
    fn unit_threshold_disables_importance() {
        // Scores never exceed 1, so every factor is 1 and RDP runs plain.
        let data = signal(300);
        let params = CompressionParams::new(0.02, CompressionMethod::RdpLinear, DataType::Financial)
            .unwrap()
            .with_importance_threshold(1.0)
            .unwrap();
        let plain = simplify::rdp_indices(&data, 0.02, None).len();
        assert_eq!(compress(&data, &params).unwrap().compressed_count(), plain);
    }
}
