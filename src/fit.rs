//! Direct fixed-point-count fitting.
//!
//! Picks `n` samples at evenly spaced indices (first and last always
//! included) and builds a curve through them without any simplification:
//! 1. B-spline: one segment whose control points are the picked samples
//! 2. Bezier: Hermite segments between consecutive picks, with slopes
//!    estimated from the original samples
//!
//! The estimators use the same sampling primitive to ask "what is the
//! error at exactly n points?".

use log::debug;

use crate::curve::CompressedCurveData;
use crate::error::CurveError;
use crate::geom::{interpolate, slope_at};
use crate::segment::CurveSegment;
use crate::simplify::strictly_increasing;
use crate::Sample;

/// Indices of `n` evenly spaced picks out of `len` samples.
///
/// `n` is clamped to `[2, len]`; indices are strictly increasing.
pub fn fixed_indices(len: usize, n: usize) -> Vec<usize> {
    match len {
        0 => Vec::new(),
        1 => vec![0],
        _ => {
            let n = n.clamp(2, len);
            let step = (len - 1) as f64 / (n - 1) as f64;
            (0..n)
                .map(|i| ((i as f64 * step).round() as usize).min(len - 1))
                .collect()
        }
    }
}

/// Exactly `clamp(n, 2, len)` samples taken from `data` at evenly spaced
/// indices. Inputs shorter than two samples are returned unchanged.
pub fn approximate_with_fixed_points(data: &[Sample], n: usize) -> Vec<Sample> {
    fixed_indices(data.len(), n)
        .into_iter()
        .map(|i| data[i])
        .collect()
}

/// Values of the piecewise-linear fit through `fit`, taken at every
/// original sample time.
pub fn reconstruct(fit: &[Sample], original: &[Sample]) -> Vec<f64> {
    original.iter().map(|s| interpolate(fit, s.time)).collect()
}

/// One B-spline segment with `n` control points sampled from `data`.
pub fn fit_bspline(data: &[Sample], n: usize) -> Result<CompressedCurveData, CurveError> {
    let picks = strictly_increasing(data, fixed_indices(data.len(), n));
    if picks.len() < 2 {
        return Ok(CompressedCurveData::empty());
    }
    let control_points: Vec<Sample> = picks.iter().map(|&i| data[i]).collect();
    debug!("bspline fit: {} control points over {} samples", control_points.len(), data.len());
    CompressedCurveData::new(vec![CurveSegment::bspline(control_points)?])
}

/// `n - 1` Hermite segments between `n` sampled keys.
pub fn fit_bezier(data: &[Sample], n: usize) -> Result<CompressedCurveData, CurveError> {
    let picks = strictly_increasing(data, fixed_indices(data.len(), n));
    debug!("bezier fit: {} keys over {} samples", picks.len(), data.len());
    let segments = picks
        .windows(2)
        .map(|pair| {
            let (lo, hi) = (pair[0], pair[1]);
            CurveSegment::bezier(data[lo], data[hi], slope_at(data, lo), slope_at(data, hi))
        })
        .collect::<Result<Vec<_>, _>>()?;
    CompressedCurveData::new(segments)
}
