//! Control-point-count estimation.
//!
//! Seven independent heuristics answer "how many points should the
//! compressed curve use for this tolerance?":
//! 1. Elbow: sharpest bend of the fit-error curve
//! 2. Curvature: share of turning-angle mass worth keeping
//! 3. Entropy: smallest fit keeping 95% of the value entropy
//! 4. Douglas-Peucker adaptive: log-log interpolated RDP point count
//! 5. Total variation: smallest fit keeping 90% of the total variation
//! 6. Error bound: smallest fit whose max error meets the tolerance
//! 7. Statistical: SNR-based upper bound on useful complexity
//!
//! None reads another's output, so [`ControlPointEstimator::estimate_all`]
//! runs them concurrently on the rayon pool.

mod adaptive;
mod bounds;
mod curvature;
mod elbow;
mod information;

use std::collections::BTreeMap;

use log::{debug, warn};
use rayon::prelude::*;

use crate::fit::approximate_with_fixed_points;
use crate::geom::EPSILON;
use crate::result::ErrorStats;
use crate::Sample;

pub const DEFAULT_MIN_POINTS: usize = 2;
pub const DEFAULT_MAX_POINTS: usize = 50;

/// Inputs shorter than this get the degenerate verdict.
const MIN_SAMPLES: usize = 3;

/// One heuristic's verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationResult {
    pub recommended_points: usize,
    /// Heuristic-specific headline number.
    pub score: f64,
    pub method: &'static str,
    /// Named diagnostics for inspection.
    pub metrics: BTreeMap<&'static str, f64>,
}

impl EstimationResult {
    fn new(method: &'static str, recommended_points: usize, score: f64) -> Self {
        Self {
            recommended_points,
            score,
            method,
            metrics: BTreeMap::new(),
        }
    }

    fn metric(mut self, name: &'static str, value: f64) -> Self {
        self.metrics.insert(name, value);
        self
    }

    /// Verdict for inputs too short to analyse: keep every sample.
    fn degenerate(method: &'static str, len: usize) -> Self {
        Self::new(method, len, 0.0).metric("samples", len as f64)
    }
}

/// The seven heuristics, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heuristic {
    Elbow,
    Curvature,
    Entropy,
    DouglasPeucker,
    TotalVariation,
    ErrorBound,
    Statistical,
}

impl Heuristic {
    pub const ALL: [Heuristic; 7] = [
        Heuristic::Elbow,
        Heuristic::Curvature,
        Heuristic::Entropy,
        Heuristic::DouglasPeucker,
        Heuristic::TotalVariation,
        Heuristic::ErrorBound,
        Heuristic::Statistical,
    ];

    /// Heuristics that recommend a count directly (the rest bound it).
    pub const DIRECT: [Heuristic; 5] = [
        Heuristic::Elbow,
        Heuristic::Curvature,
        Heuristic::Entropy,
        Heuristic::DouglasPeucker,
        Heuristic::TotalVariation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Elbow => "elbow",
            Heuristic::Curvature => "curvature",
            Heuristic::Entropy => "entropy",
            Heuristic::DouglasPeucker => "douglas_peucker",
            Heuristic::TotalVariation => "total_variation",
            Heuristic::ErrorBound => "error_bound",
            Heuristic::Statistical => "statistical",
        }
    }
}

/// Runs the heuristics over a `[min_points, max_points]` search range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPointEstimator {
    pub min_points: usize,
    pub max_points: usize,
}

impl Default for ControlPointEstimator {
    fn default() -> Self {
        Self {
            min_points: DEFAULT_MIN_POINTS,
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

impl ControlPointEstimator {
    pub fn new(min_points: usize, max_points: usize) -> Self {
        Self {
            min_points,
            max_points,
        }
    }

    /// Search range clamped to the data: at least 2, at most `len`.
    fn search_range(&self, len: usize) -> (usize, usize) {
        let hi = self.max_points.min(len).max(2);
        let lo = self.min_points.max(2).min(hi);
        (lo, hi)
    }

    /// Run one heuristic.
    pub fn estimate(&self, heuristic: Heuristic, data: &[Sample], tolerance: f64) -> EstimationResult {
        let name = heuristic.name();
        if data.len() < MIN_SAMPLES {
            return EstimationResult::degenerate(name, data.len());
        }
        let tolerance = checked_tolerance(tolerance);
        let (lo, hi) = self.search_range(data.len());
        let result = match heuristic {
            Heuristic::Elbow => elbow::estimate(data, lo, hi),
            Heuristic::Curvature => curvature::estimate(data, lo, hi),
            Heuristic::Entropy => information::estimate_entropy(data, lo, hi),
            Heuristic::DouglasPeucker => adaptive::estimate(data, tolerance, lo, hi),
            Heuristic::TotalVariation => information::estimate_total_variation(data, lo, hi),
            Heuristic::ErrorBound => bounds::error_bound(data, tolerance),
            Heuristic::Statistical => bounds::statistical(data),
        };
        debug!(
            "{}: {} points (score {:.4})",
            name, result.recommended_points, result.score
        );
        result
    }

    pub fn estimate_by_elbow_method(&self, data: &[Sample], tolerance: f64) -> EstimationResult {
        self.estimate(Heuristic::Elbow, data, tolerance)
    }

    pub fn estimate_by_curvature(&self, data: &[Sample], tolerance: f64) -> EstimationResult {
        self.estimate(Heuristic::Curvature, data, tolerance)
    }

    pub fn estimate_by_entropy(&self, data: &[Sample], tolerance: f64) -> EstimationResult {
        self.estimate(Heuristic::Entropy, data, tolerance)
    }

    pub fn estimate_by_douglas_peucker(&self, data: &[Sample], tolerance: f64) -> EstimationResult {
        self.estimate(Heuristic::DouglasPeucker, data, tolerance)
    }

    pub fn estimate_by_total_variation(&self, data: &[Sample], tolerance: f64) -> EstimationResult {
        self.estimate(Heuristic::TotalVariation, data, tolerance)
    }

    /// Upper-bound search: smallest count whose fit meets `tolerance`.
    pub fn determine_by_error_bound(&self, data: &[Sample], tolerance: f64) -> EstimationResult {
        self.estimate(Heuristic::ErrorBound, data, tolerance)
    }

    /// Upper bound on useful complexity from the signal-to-noise ratio.
    pub fn determine_by_statistics(&self, data: &[Sample], tolerance: f64) -> EstimationResult {
        self.estimate(Heuristic::Statistical, data, tolerance)
    }

    /// Every heuristic, keyed by name.
    pub fn estimate_all(&self, data: &[Sample], tolerance: f64) -> BTreeMap<&'static str, EstimationResult> {
        Heuristic::ALL
            .par_iter()
            .map(|&h| (h.name(), self.estimate(h, data, tolerance)))
            .collect()
    }
}

/// Median of the direct heuristics' recommendations, capped at the
/// statistical upper bound when that verdict is present.
///
/// Returns `None` when no direct heuristic is in `results`.
pub fn consensus(results: &BTreeMap<&'static str, EstimationResult>) -> Option<usize> {
    let mut counts: Vec<usize> = Heuristic::DIRECT
        .iter()
        .filter_map(|h| results.get(h.name()))
        .map(|r| r.recommended_points)
        .collect();
    if counts.is_empty() {
        return None;
    }
    counts.sort_unstable();
    let median = counts[(counts.len() - 1) / 2];
    let cap = results
        .get(Heuristic::Statistical.name())
        .map_or(usize::MAX, |r| r.recommended_points);
    Some(median.min(cap))
}

/// Error statistics of the fixed-point fit with `n` points.
fn fit_errors(data: &[Sample], n: usize) -> ErrorStats {
    ErrorStats::discrete(data, &approximate_with_fixed_points(data, n))
}

fn checked_tolerance(tolerance: f64) -> f64 {
    if tolerance.is_finite() && tolerance > 0.0 {
        tolerance
    } else {
        warn!("estimator tolerance {tolerance} is not positive; using {EPSILON}");
        EPSILON
    }
}
