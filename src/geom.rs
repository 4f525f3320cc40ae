//! Shared numeric utilities.

use kurbo::Point;

use crate::Sample;

/// Widths and spans below this are treated as zero.
pub const EPSILON: f64 = 1e-10;

/// Position of `x` within `[start, end]` as a fraction, unclamped.
///
/// Returns 0 when the interval has (almost) no width.
pub fn safe_parameter(x: f64, start: f64, end: f64) -> f64 {
    let width = end - start;
    if width.abs() < EPSILON {
        0.0
    } else {
        (x - start) / width
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn to_point(sample: Sample) -> Point {
    Point::new(sample.time, sample.value)
}

/// Distance from point P to line through A→B.
pub fn point_to_line_dist(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let ap = p - a;
    let len_sq = ab.hypot2();
    if len_sq < EPSILON {
        return ap.hypot();
    }
    ab.cross(ap).abs() / len_sq.sqrt()
}

/// Unsigned turning angle at `b` between A→B and B→C, in radians [0, pi].
///
/// Zero-length legs give 0.
pub fn turning_angle(a: Point, b: Point, c: Point) -> f64 {
    let v_in = b - a;
    let v_out = c - b;
    let (len_in, len_out) = (v_in.hypot(), v_out.hypot());
    if len_in < EPSILON || len_out < EPSILON {
        return 0.0;
    }
    let dot = (v_in / len_in).dot(v_out / len_out);
    // acos is ill-conditioned at 1; collinear legs would read as ~1e-8 rad.
    if dot >= 1.0 - 1e-12 {
        return 0.0;
    }
    dot.clamp(-1.0, 1.0).acos()
}

/// Linearly interpolate a time-sorted sample sequence at `time`.
///
/// Outside the covered range the nearest endpoint value is returned.
/// Empty input yields 0.
pub fn interpolate(samples: &[Sample], time: f64) -> f64 {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return 0.0,
    };
    if time <= first.time {
        return first.value;
    }
    if time >= last.time {
        return last.value;
    }
    // First index whose time is >= `time`; always in 1..len here.
    let hi = samples.partition_point(|s| s.time < time);
    let a = samples[hi - 1];
    let b = samples[hi];
    lerp(a.value, b.value, safe_parameter(time, a.time, b.time))
}

/// Slope at sample `i`: central difference inside, one-sided at the ends.
pub fn slope_at(samples: &[Sample], i: usize) -> f64 {
    let n = samples.len();
    if n < 2 {
        return 0.0;
    }
    let lo = i.saturating_sub(1);
    let hi = (i + 1).min(n - 1);
    let dt = samples[hi].time - samples[lo].time;
    if dt.abs() < EPSILON {
        0.0
    } else {
        (samples[hi].value - samples[lo].value) / dt
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Sum of absolute consecutive differences.
pub fn total_variation(values: &[f64]) -> f64 {
    values.windows(2).map(|w| (w[1] - w[0]).abs()).sum()
}

/// Histogram bin count for `len` values: `len / 5`, within [1, 20].
pub fn bin_count(len: usize) -> usize {
    (len / 5).clamp(1, 20)
}

/// Shannon entropy (bits) of `values` over `bins` equal bins spanning
/// `[lo, hi]`. Values outside the span fall into the edge bins.
///
/// A zero-width span carries no information and yields 0.
pub fn histogram_entropy(values: &[f64], lo: f64, hi: f64, bins: usize) -> f64 {
    let span = hi - lo;
    if values.is_empty() || bins == 0 || span < EPSILON {
        return 0.0;
    }
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / span) * bins as f64).floor();
        let idx = (idx.max(0.0) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let total = values.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

pub fn value_range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(pairs: &[(f64, f64)]) -> Vec<Sample> {
        pairs.iter().map(|&(t, v)| Sample::new(t, v)).collect()
    }

    #[test]
    fn safe_parameter_guards_zero_width() {
        assert_eq!(safe_parameter(3.0, 2.0, 2.0), 0.0);
        assert!((safe_parameter(3.0, 2.0, 4.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn interpolate_clamps_and_blends() {
        let s = samples(&[(0.0, 0.0), (1.0, 10.0), (3.0, 30.0)]);
        assert_eq!(interpolate(&s, -5.0), 0.0);
        assert_eq!(interpolate(&s, 9.0), 30.0);
        assert!((interpolate(&s, 0.5) - 5.0).abs() < 1e-12);
        assert!((interpolate(&s, 2.0) - 20.0).abs() < 1e-12);
        assert_eq!(interpolate(&s, 1.0), 10.0);
        assert_eq!(interpolate(&[], 1.0), 0.0);
    }

    #[test]
    fn perpendicular_distance_to_chord() {
        let d = point_to_line_dist(Point::new(1.0, 1.0), Point::new(0.0, 0.0), Point::new(2.0, 0.0));
        assert!((d - 1.0).abs() < 1e-12);
        // Degenerate chord falls back to point distance.
        let d = point_to_line_dist(Point::new(3.0, 4.0), Point::ZERO, Point::ZERO);
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn turning_angle_of_right_turn() {
        let a = turning_angle(Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0));
        assert!((a - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        let straight = turning_angle(Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0));
        assert_eq!(straight, 0.0);
        assert_eq!(turning_angle(Point::ZERO, Point::ZERO, Point::new(1.0, 0.0)), 0.0);
    }

    #[test]
    fn entropy_of_uniform_and_flat_values() {
        let values: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let h = histogram_entropy(&values, 0.0, 7.0, 8);
        assert!((h - 3.0).abs() < 1e-12);
        assert_eq!(histogram_entropy(&[2.0, 2.0, 2.0], 2.0, 2.0, 4), 0.0);
    }

    #[test]
    fn bin_count_is_bounded() {
        assert_eq!(bin_count(0), 1);
        assert_eq!(bin_count(50), 10);
        assert_eq!(bin_count(1000), 20);
    }

    #[test]
    fn variation_and_spread() {
        assert_eq!(total_variation(&[0.0, 2.0, 1.0, 1.0]), 3.0);
        assert!((std_dev(&[1.0, 3.0]) - 1.0).abs() < 1e-12);
        assert_eq!(std_dev(&[4.0]), 0.0);
    }
}
