//! Tolerance-driven simplification: importance-weighted RDP.
//!
//! The deviation of each candidate sample from the current chord is
//! multiplied by its importance factor before the tolerance test, so
//! salient samples survive at tolerances that would drop plain ones.
//! Each surviving range collapses to one segment of the requested kind.

use log::{debug, trace};

use crate::curve::CompressedCurveData;
use crate::error::CurveError;
use crate::geom::{point_to_line_dist, slope_at, to_point};
use crate::segment::{CurveSegment, SegmentKind};
use crate::Sample;

/// Indices of the samples RDP keeps, ascending. The first and last
/// samples are always kept.
///
/// `factors` scales each sample's deviation; `None` (or a slice of the
/// wrong length) means plain RDP. Ties in weighted deviation go to the
/// lowest index.
pub fn rdp_indices(samples: &[Sample], tolerance: f64, factors: Option<&[f64]>) -> Vec<usize> {
    let n = samples.len();
    if n <= 2 {
        return (0..n).collect();
    }
    let factors = factors.filter(|f| f.len() == n);

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    // Explicit stack: long monotone runs would otherwise recurse n deep.
    let mut ranges = vec![(0usize, n - 1)];
    while let Some((lo, hi)) = ranges.pop() {
        if hi - lo <= 1 {
            continue;
        }
        let a = to_point(samples[lo]);
        let b = to_point(samples[hi]);
        let mut max_dev = 0.0;
        let mut split = lo;
        for k in lo + 1..hi {
            let weight = factors.map_or(1.0, |f| f[k]);
            let dev = weight * point_to_line_dist(to_point(samples[k]), a, b);
            if dev > max_dev {
                max_dev = dev;
                split = k;
            }
        }
        if max_dev > tolerance {
            trace!("rdp split [{lo}, {hi}] at {split} (weighted deviation {max_dev:.6})");
            keep[split] = true;
            ranges.push((split, hi));
            ranges.push((lo, split));
        }
    }

    keep.iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect()
}

/// The samples RDP keeps.
pub fn simplify_points(samples: &[Sample], tolerance: f64, factors: Option<&[f64]>) -> Vec<Sample> {
    rdp_indices(samples, tolerance, factors)
        .into_iter()
        .map(|i| samples[i])
        .collect()
}

/// Simplify into a curve of `kind` segments between RDP breakpoints.
///
/// Fewer than two distinct sample times give an empty curve.
pub fn simplify(
    samples: &[Sample],
    tolerance: f64,
    kind: SegmentKind,
    factors: Option<&[f64]>,
) -> Result<CompressedCurveData, CurveError> {
    let breakpoints = strictly_increasing(samples, rdp_indices(samples, tolerance, factors));
    debug!(
        "rdp kept {} of {} samples at tolerance {}",
        breakpoints.len(),
        samples.len(),
        tolerance
    );
    let segments = breakpoints
        .windows(2)
        .map(|pair| segment_between(samples, pair[0], pair[1], kind))
        .collect::<Result<Vec<_>, _>>()?;
    CompressedCurveData::new(segments)
}

/// One segment spanning `samples[lo..=hi]`.
fn segment_between(
    samples: &[Sample],
    lo: usize,
    hi: usize,
    kind: SegmentKind,
) -> Result<CurveSegment, CurveError> {
    let (start, end) = (samples[lo], samples[hi]);
    match kind {
        SegmentKind::Linear => CurveSegment::linear(start, end),
        SegmentKind::BSpline => {
            let mid_time = (start.time + end.time) / 2.0;
            let mid = (lo + 1..hi)
                .filter(|&k| samples[k].time > start.time && samples[k].time < end.time)
                .min_by(|&x, &y| {
                    let dx = (samples[x].time - mid_time).abs();
                    let dy = (samples[y].time - mid_time).abs();
                    dx.total_cmp(&dy)
                });
            match mid {
                Some(k) => CurveSegment::bspline(vec![start, samples[k], end]),
                None => CurveSegment::bspline(vec![start, end]),
            }
        }
        SegmentKind::Bezier => {
            CurveSegment::bezier(start, end, slope_at(samples, lo), slope_at(samples, hi))
        }
    }
}

/// Drop indices whose time does not advance past the previous kept one.
pub(crate) fn strictly_increasing(samples: &[Sample], indices: Vec<usize>) -> Vec<usize> {
    let mut out: Vec<usize> = Vec::with_capacity(indices.len());
    for i in indices {
        match out.last() {
            Some(&prev) if samples[i].time <= samples[prev].time => {}
            _ => out.push(i),
        }
    }
    out
}
