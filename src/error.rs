use thiserror::Error;

/// Errors that can occur while configuring or building curves.
///
/// Degenerate inputs (empty or single-sample sequences, zero-width
/// intervals) are absorbed by the algorithms and never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CurveError {
    #[error("tolerance must be in (0, 1], got {0}")]
    InvalidTolerance(f64),

    #[error("importance threshold must be positive, got {0}")]
    InvalidImportanceThreshold(f64),

    #[error("invalid importance weights: {0}")]
    InvalidWeights(String),

    #[error("invalid segment: {0}")]
    InvalidSegment(String),

    #[error("invalid curve: {0}")]
    InvalidCurve(String),

    #[error("unknown compression method: {0}")]
    UnknownMethod(String),

    #[error("unknown data type: {0}")]
    UnknownDataType(String),
}
