//! Reconstruction error and compression summaries.
//!
//! Two error paths, both measured at every original sample time:
//! against a discrete compressed sample sequence (linearly interpolated,
//! clamped at its ends) and against a continuous curve (evaluated
//! directly).

use std::fmt;
use std::time::Duration;

use crate::curve::CompressedCurveData;
use crate::geom::interpolate;
use crate::Sample;

/// Absolute-error statistics over a set of residuals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ErrorStats {
    pub mean_abs: f64,
    pub max_abs: f64,
    /// Mean squared error.
    pub mse: f64,
}

impl ErrorStats {
    /// Statistics of `original[i].value - reconstructed[i]`.
    pub fn from_values(original: &[Sample], reconstructed: impl IntoIterator<Item = f64>) -> Self {
        let mut sum_abs = 0.0;
        let mut sum_sq = 0.0;
        let mut max_abs = 0.0f64;
        let mut count = 0usize;
        for (s, r) in original.iter().zip(reconstructed) {
            let e = (s.value - r).abs();
            sum_abs += e;
            sum_sq += e * e;
            max_abs = max_abs.max(e);
            count += 1;
        }
        if count == 0 {
            return Self::default();
        }
        Self {
            mean_abs: sum_abs / count as f64,
            max_abs,
            mse: sum_sq / count as f64,
        }
    }

    /// Errors of a discrete compressed sequence.
    pub fn discrete(original: &[Sample], compressed: &[Sample]) -> Self {
        Self::from_values(original, original.iter().map(|s| interpolate(compressed, s.time)))
    }

    /// Errors of a continuous curve.
    pub fn continuous(original: &[Sample], curve: &CompressedCurveData) -> Self {
        Self::from_values(original, original.iter().map(|s| curve.evaluate(s.time)))
    }
}

/// Summary of one compression run. Built once; read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionResult {
    original_count: usize,
    compressed_count: usize,
    compression_ratio: f64,
    errors: ErrorStats,
    elapsed: Option<Duration>,
}

impl CompressionResult {
    fn build(original_count: usize, compressed_count: usize, errors: ErrorStats) -> Self {
        let compression_ratio = if original_count == 0 {
            0.0
        } else {
            compressed_count as f64 / original_count as f64
        };
        Self {
            original_count,
            compressed_count,
            compression_ratio,
            errors,
            elapsed: None,
        }
    }

    /// Compare the original samples with a compressed sample sequence.
    pub fn from_samples(original: &[Sample], compressed: &[Sample]) -> Self {
        Self::build(
            original.len(),
            compressed.len(),
            ErrorStats::discrete(original, compressed),
        )
    }

    /// Compare the original samples with a compressed curve. The
    /// compressed count is the curve's stored key count.
    pub fn from_curve(original: &[Sample], curve: &CompressedCurveData) -> Self {
        Self::build(
            original.len(),
            curve.point_count(),
            ErrorStats::continuous(original, curve),
        )
    }

    pub fn with_elapsed(self, elapsed: Duration) -> Self {
        Self {
            elapsed: Some(elapsed),
            ..self
        }
    }

    pub fn original_count(&self) -> usize {
        self.original_count
    }

    pub fn compressed_count(&self) -> usize {
        self.compressed_count
    }

    /// `compressed_count / original_count`; 0 for empty input.
    pub fn compression_ratio(&self) -> f64 {
        self.compression_ratio
    }

    pub fn mean_error(&self) -> f64 {
        self.errors.mean_abs
    }

    pub fn max_error(&self) -> f64 {
        self.errors.max_abs
    }

    pub fn errors(&self) -> ErrorStats {
        self.errors
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}

impl fmt::Display for CompressionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  Points      {} \u{2192} {}  (ratio {:.3})",
            self.original_count, self.compressed_count, self.compression_ratio,
        )?;
        writeln!(
            f,
            "  Error       mean {:.6}  max {:.6}",
            self.errors.mean_abs, self.errors.max_abs,
        )?;
        if let Some(elapsed) = self.elapsed {
            writeln!(f, "  Time        {:.3}ms", elapsed.as_secs_f64() * 1000.0)?;
        }
        Ok(())
    }
}
