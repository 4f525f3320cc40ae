//! Curve segments and single-segment evaluation.
//!
//! Each segment kind owns only the data it needs. Segments are validated
//! on construction (`start_time < end_time`) and immutable afterwards.

use kurbo::{CubicBez, Line, ParamCurve, Point};

use crate::error::CurveError;
use crate::geom::{lerp, safe_parameter};
use crate::Sample;

/// Which family of segment a simplifier should emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Linear,
    BSpline,
    Bezier,
}

/// Straight line between two keys.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSegment {
    start: Sample,
    end: Sample,
}

impl LinearSegment {
    pub fn new(start: Sample, end: Sample) -> Result<Self, CurveError> {
        check_span(start.time, end.time)?;
        Ok(Self { start, end })
    }

    fn evaluate(&self, t: f64) -> f64 {
        Line::new(
            Point::new(0.0, self.start.value),
            Point::new(1.0, self.end.value),
        )
        .eval(t)
        .y
    }
}

/// Uniform B-spline over an ordered control polygon.
///
/// Exactly four control points use the closed-form cubic basis; any other
/// count is evaluated as a piecewise-linear walk over the control polygon,
/// split into equal parameter steps. The latter is an approximation of a
/// true B-spline, kept as documented behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct BSplineSegment {
    control_points: Vec<Sample>,
}

impl BSplineSegment {
    pub fn new(control_points: Vec<Sample>) -> Result<Self, CurveError> {
        let (first, last) = match (control_points.first(), control_points.last()) {
            (Some(first), Some(last)) if control_points.len() >= 2 => (*first, *last),
            _ => {
                return Err(CurveError::InvalidSegment(format!(
                    "B-spline needs at least 2 control points, got {}",
                    control_points.len()
                )))
            }
        };
        check_span(first.time, last.time)?;
        Ok(Self { control_points })
    }

    pub fn control_points(&self) -> &[Sample] {
        &self.control_points
    }

    fn evaluate(&self, t: f64) -> f64 {
        let cp = &self.control_points;
        match cp.len() {
            4 => {
                let t2 = t * t;
                let t3 = t2 * t;
                let b0 = (1.0 - t).powi(3) / 6.0;
                let b1 = (3.0 * t3 - 6.0 * t2 + 4.0) / 6.0;
                let b2 = (-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) / 6.0;
                let b3 = t3 / 6.0;
                b0 * cp[0].value + b1 * cp[1].value + b2 * cp[2].value + b3 * cp[3].value
            }
            n => {
                let spans = (n - 1) as f64;
                let pos = t * spans;
                let i = (pos.floor().max(0.0) as usize).min(n - 2);
                lerp(cp[i].value, cp[i + 1].value, pos - i as f64)
            }
        }
    }
}

/// Cubic Hermite segment: end values plus end slopes.
///
/// `in_tangent` is the slope at the start key and `out_tangent` the slope
/// at the end key, both in value units per time unit.
#[derive(Debug, Clone, PartialEq)]
pub struct HermiteSegment {
    start: Sample,
    end: Sample,
    in_tangent: f64,
    out_tangent: f64,
}

impl HermiteSegment {
    pub fn new(
        start: Sample,
        end: Sample,
        in_tangent: f64,
        out_tangent: f64,
    ) -> Result<Self, CurveError> {
        check_span(start.time, end.time)?;
        if !in_tangent.is_finite() || !out_tangent.is_finite() {
            return Err(CurveError::InvalidSegment(format!(
                "non-finite tangent ({in_tangent}, {out_tangent})"
            )));
        }
        Ok(Self {
            start,
            end,
            in_tangent,
            out_tangent,
        })
    }

    pub fn in_tangent(&self) -> f64 {
        self.in_tangent
    }

    pub fn out_tangent(&self) -> f64 {
        self.out_tangent
    }

    /// Equivalent cubic Bezier in (time, value) space.
    ///
    /// Handles sit at one third of the segment width, so time is linear in
    /// the curve parameter and the Bezier's y equals the Hermite value.
    pub fn to_cubic(&self) -> CubicBez {
        let dt = self.end.time - self.start.time;
        CubicBez::new(
            Point::new(self.start.time, self.start.value),
            Point::new(
                self.start.time + dt / 3.0,
                self.start.value + self.in_tangent * dt / 3.0,
            ),
            Point::new(
                self.end.time - dt / 3.0,
                self.end.value - self.out_tangent * dt / 3.0,
            ),
            Point::new(self.end.time, self.end.value),
        )
    }

    fn evaluate(&self, t: f64) -> f64 {
        self.to_cubic().eval(t).y
    }
}

/// One piece of a compressed curve.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveSegment {
    Linear(LinearSegment),
    BSpline(BSplineSegment),
    Bezier(HermiteSegment),
}

impl CurveSegment {
    pub fn linear(start: Sample, end: Sample) -> Result<Self, CurveError> {
        LinearSegment::new(start, end).map(CurveSegment::Linear)
    }

    pub fn bspline(control_points: Vec<Sample>) -> Result<Self, CurveError> {
        BSplineSegment::new(control_points).map(CurveSegment::BSpline)
    }

    pub fn bezier(
        start: Sample,
        end: Sample,
        in_tangent: f64,
        out_tangent: f64,
    ) -> Result<Self, CurveError> {
        HermiteSegment::new(start, end, in_tangent, out_tangent).map(CurveSegment::Bezier)
    }

    pub fn kind(&self) -> SegmentKind {
        match self {
            CurveSegment::Linear(_) => SegmentKind::Linear,
            CurveSegment::BSpline(_) => SegmentKind::BSpline,
            CurveSegment::Bezier(_) => SegmentKind::Bezier,
        }
    }

    pub fn start(&self) -> Sample {
        match self {
            CurveSegment::Linear(s) => s.start,
            CurveSegment::BSpline(s) => s.control_points[0],
            CurveSegment::Bezier(s) => s.start,
        }
    }

    pub fn end(&self) -> Sample {
        match self {
            CurveSegment::Linear(s) => s.end,
            CurveSegment::BSpline(s) => s.control_points[s.control_points.len() - 1],
            CurveSegment::Bezier(s) => s.end,
        }
    }

    pub fn start_time(&self) -> f64 {
        self.start().time
    }

    pub fn end_time(&self) -> f64 {
        self.end().time
    }

    pub fn start_value(&self) -> f64 {
        self.start().value
    }

    pub fn end_value(&self) -> f64 {
        self.end().value
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time() && time <= self.end_time()
    }

    /// Number of stored keys, counting both ends.
    pub fn key_count(&self) -> usize {
        match self {
            CurveSegment::BSpline(s) => s.control_points.len(),
            _ => 2,
        }
    }

    /// Value at `time`; outside the segment the parameter is clamped to
    /// the nearest end.
    pub fn evaluate(&self, time: f64) -> f64 {
        let t = safe_parameter(time, self.start_time(), self.end_time()).clamp(0.0, 1.0);
        match self {
            CurveSegment::Linear(s) => s.evaluate(t),
            CurveSegment::BSpline(s) => s.evaluate(t),
            CurveSegment::Bezier(s) => s.evaluate(t),
        }
    }
}

fn check_span(start_time: f64, end_time: f64) -> Result<(), CurveError> {
    if start_time.is_finite() && end_time.is_finite() && start_time < end_time {
        Ok(())
    } else {
        Err(CurveError::InvalidSegment(format!(
            "start time {start_time} must precede end time {end_time}"
        )))
    }
}
