//! Whole-curve container: contiguous, time-ordered segments.

use crate::error::CurveError;
use crate::segment::{CurveSegment, SegmentKind};
use crate::Sample;

/// Relative slack allowed between one segment's end and the next start.
const JOIN_TOLERANCE: f64 = 1e-9;

/// Ordered, non-overlapping segments covering one continuous time range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompressedCurveData {
    segments: Vec<CurveSegment>,
}

impl CompressedCurveData {
    /// Build a curve, checking the segments are sorted and contiguous.
    pub fn new(segments: Vec<CurveSegment>) -> Result<Self, CurveError> {
        for (i, pair) in segments.windows(2).enumerate() {
            let prev_end = pair[0].end_time();
            let next_start = pair[1].start_time();
            let slack = JOIN_TOLERANCE * prev_end.abs().max(1.0);
            if (next_start - prev_end).abs() > slack {
                return Err(CurveError::InvalidCurve(format!(
                    "segment {} ends at {} but segment {} starts at {}",
                    i,
                    prev_end,
                    i + 1,
                    next_start
                )));
            }
        }
        Ok(Self { segments })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[CurveSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn start_time(&self) -> Option<f64> {
        self.segments.first().map(CurveSegment::start_time)
    }

    pub fn end_time(&self) -> Option<f64> {
        self.segments.last().map(CurveSegment::end_time)
    }

    /// Kind shared by every segment, if the curve is uniform.
    pub fn kind(&self) -> Option<SegmentKind> {
        let first = self.segments.first()?.kind();
        self.segments
            .iter()
            .all(|s| s.kind() == first)
            .then_some(first)
    }

    /// Number of distinct stored keys: shared segment boundaries count
    /// once, interior B-spline control points count individually.
    pub fn point_count(&self) -> usize {
        if self.segments.is_empty() {
            return 0;
        }
        1 + self
            .segments
            .iter()
            .map(|s| s.key_count() - 1)
            .sum::<usize>()
    }

    /// Segment boundary keys: every segment start plus the final end.
    pub fn breakpoints(&self) -> Vec<Sample> {
        let mut keys: Vec<Sample> = self.segments.iter().map(CurveSegment::start).collect();
        if let Some(last) = self.segments.last() {
            keys.push(last.end());
        }
        keys
    }

    /// Value at `time`. The first segment whose range contains `time`
    /// answers; outside the covered range the nearest boundary value is
    /// returned. An empty curve evaluates to 0.
    pub fn evaluate(&self, time: f64) -> f64 {
        let (first, last) = match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if time < first.start_time() {
            return first.evaluate(time);
        }
        match self.segments.iter().find(|s| s.contains(time)) {
            Some(segment) => segment.evaluate(time),
            None => last.evaluate(time),
        }
    }

    /// Resample uniformly across the covered range.
    ///
    /// `count == 0` or an empty curve yields nothing; `count == 1` yields
    /// the start key.
    pub fn to_samples(&self, count: usize) -> Vec<Sample> {
        let (start, end) = match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) if count > 0 => (start, end),
            _ => return Vec::new(),
        };
        if count == 1 {
            return vec![Sample::new(start, self.evaluate(start))];
        }
        let step = (end - start) / (count - 1) as f64;
        (0..count)
            .map(|i| {
                // Pin the last sample to the exact end time.
                let time = if i == count - 1 { end } else { start + step * i as f64 };
                Sample::new(time, self.evaluate(time))
            })
            .collect()
    }

    /// Evaluate at each of the given times.
    pub fn sample_at(&self, times: impl IntoIterator<Item = f64>) -> Vec<Sample> {
        times
            .into_iter()
            .map(|t| Sample::new(t, self.evaluate(t)))
            .collect()
    }
}
