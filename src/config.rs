use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// Algorithm used by [`crate::compress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompressionMethod {
    /// Importance-weighted RDP, linear segments between breakpoints.
    RdpLinear,
    /// Importance-weighted RDP, one B-spline per collapsed range.
    RdpBSpline,
    /// Importance-weighted RDP, Hermite segments with sampled tangents.
    RdpBezier,
    /// Single B-spline through a fixed number of sampled control points.
    BSplineDirect,
    /// Hermite segments between a fixed number of sampled keys.
    BezierDirect,
}

impl CompressionMethod {
    pub const ALL: [CompressionMethod; 5] = [
        CompressionMethod::RdpLinear,
        CompressionMethod::RdpBSpline,
        CompressionMethod::RdpBezier,
        CompressionMethod::BSplineDirect,
        CompressionMethod::BezierDirect,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CompressionMethod::RdpLinear => "rdp-linear",
            CompressionMethod::RdpBSpline => "rdp-bspline",
            CompressionMethod::RdpBezier => "rdp-bezier",
            CompressionMethod::BSplineDirect => "bspline-direct",
            CompressionMethod::BezierDirect => "bezier-direct",
        }
    }

    /// Whether the method takes a fixed control-point count instead of
    /// letting the tolerance decide.
    pub fn is_direct(self) -> bool {
        matches!(
            self,
            CompressionMethod::BSplineDirect | CompressionMethod::BezierDirect
        )
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionMethod {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|m| m.name() == key)
            .ok_or_else(|| CurveError::UnknownMethod(s.to_string()))
    }
}

/// Kind of signal being compressed. Selects the default importance weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataType {
    Animation,
    Sensor,
    Financial,
    /// Caller-supplied weights; defaults to an even balance.
    Custom,
}

impl DataType {
    pub const ALL: [DataType; 4] = [
        DataType::Animation,
        DataType::Sensor,
        DataType::Financial,
        DataType::Custom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DataType::Animation => "animation",
            DataType::Sensor => "sensor",
            DataType::Financial => "financial",
            DataType::Custom => "custom",
        }
    }

    pub fn default_weights(self) -> ImportanceWeights {
        match self {
            DataType::Animation => ImportanceWeights::ANIMATION,
            DataType::Sensor => ImportanceWeights::SENSOR,
            DataType::Financial => ImportanceWeights::FINANCIAL,
            DataType::Custom => ImportanceWeights::EVEN,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.name() == key)
            .ok_or_else(|| CurveError::UnknownDataType(s.to_string()))
    }
}

/// Relative weight of each per-sample importance component.
///
/// Weights need not sum to 1; [`ImportanceWeights::normalized`] rescales
/// them before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportanceWeights {
    pub curvature: f64,
    pub change_rate: f64,
    pub local_variance: f64,
    pub extreme_value: f64,
}

impl ImportanceWeights {
    /// Shape matters most: keys sit where the motion turns.
    pub const ANIMATION: Self = Self {
        curvature: 0.4,
        change_rate: 0.3,
        local_variance: 0.2,
        extreme_value: 0.1,
    };
    /// Noisy traces: favour rate and local spread over raw turning angle.
    pub const SENSOR: Self = Self {
        curvature: 0.2,
        change_rate: 0.3,
        local_variance: 0.3,
        extreme_value: 0.2,
    };
    /// Jumps and highs/lows carry the information.
    pub const FINANCIAL: Self = Self {
        curvature: 0.15,
        change_rate: 0.35,
        local_variance: 0.2,
        extreme_value: 0.3,
    };
    pub const EVEN: Self = Self {
        curvature: 0.25,
        change_rate: 0.25,
        local_variance: 0.25,
        extreme_value: 0.25,
    };

    pub fn new(
        curvature: f64,
        change_rate: f64,
        local_variance: f64,
        extreme_value: f64,
    ) -> Result<Self, CurveError> {
        let weights = Self {
            curvature,
            change_rate,
            local_variance,
            extreme_value,
        };
        weights.validate()?;
        Ok(weights)
    }

    fn validate(&self) -> Result<(), CurveError> {
        for (name, w) in self.components() {
            if !w.is_finite() || w < 0.0 {
                return Err(CurveError::InvalidWeights(format!("{name} = {w}")));
            }
        }
        Ok(())
    }

    fn components(&self) -> [(&'static str, f64); 4] {
        [
            ("curvature", self.curvature),
            ("changeRate", self.change_rate),
            ("localVariance", self.local_variance),
            ("extremeValue", self.extreme_value),
        ]
    }

    /// Weights rescaled to sum to 1. All-zero weights become [`Self::EVEN`].
    pub fn normalized(&self) -> Self {
        let sum = self.curvature + self.change_rate + self.local_variance + self.extreme_value;
        if sum <= f64::EPSILON {
            return Self::EVEN;
        }
        Self {
            curvature: self.curvature / sum,
            change_rate: self.change_rate / sum,
            local_variance: self.local_variance / sum,
            extreme_value: self.extreme_value / sum,
        }
    }
}

impl Default for ImportanceWeights {
    fn default() -> Self {
        Self::ANIMATION
    }
}

/// All compression parameters in one struct.
///
/// Tolerance and importance threshold are checked on every construction
/// and assignment; an out-of-range value is an error, never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParams", into = "RawParams")]
pub struct CompressionParams {
    tolerance: f64,
    importance_threshold: f64,
    method: CompressionMethod,
    data_type: DataType,
    weights: ImportanceWeights,
    point_count: Option<usize>,
}

pub const DEFAULT_TOLERANCE: f64 = 0.01;
pub const DEFAULT_IMPORTANCE_THRESHOLD: f64 = 0.5;

impl CompressionParams {
    pub fn new(
        tolerance: f64,
        method: CompressionMethod,
        data_type: DataType,
    ) -> Result<Self, CurveError> {
        check_tolerance(tolerance)?;
        Ok(Self {
            tolerance,
            importance_threshold: DEFAULT_IMPORTANCE_THRESHOLD,
            method,
            data_type,
            weights: data_type.default_weights(),
            point_count: None,
        })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn importance_threshold(&self) -> f64 {
        self.importance_threshold
    }

    pub fn method(&self) -> CompressionMethod {
        self.method
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn weights(&self) -> &ImportanceWeights {
        &self.weights
    }

    /// Requested control-point count for the Direct methods.
    pub fn point_count(&self) -> Option<usize> {
        self.point_count
    }

    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<(), CurveError> {
        check_tolerance(tolerance)?;
        self.tolerance = tolerance;
        Ok(())
    }

    pub fn set_importance_threshold(&mut self, threshold: f64) -> Result<(), CurveError> {
        check_importance_threshold(threshold)?;
        self.importance_threshold = threshold;
        Ok(())
    }

    pub fn set_method(&mut self, method: CompressionMethod) {
        self.method = method;
    }

    /// Switch data type; the weights reset to that type's preset.
    pub fn set_data_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
        self.weights = data_type.default_weights();
    }

    pub fn set_weights(&mut self, weights: ImportanceWeights) -> Result<(), CurveError> {
        weights.validate()?;
        self.weights = weights;
        Ok(())
    }

    pub fn set_point_count(&mut self, count: Option<usize>) {
        self.point_count = count;
    }

    pub fn with_importance_threshold(mut self, threshold: f64) -> Result<Self, CurveError> {
        self.set_importance_threshold(threshold)?;
        Ok(self)
    }

    pub fn with_point_count(mut self, count: usize) -> Self {
        self.point_count = Some(count);
        self
    }
}

impl Default for CompressionParams {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            importance_threshold: DEFAULT_IMPORTANCE_THRESHOLD,
            method: CompressionMethod::RdpLinear,
            data_type: DataType::Animation,
            weights: ImportanceWeights::ANIMATION,
            point_count: None,
        }
    }
}

fn check_tolerance(tolerance: f64) -> Result<(), CurveError> {
    if tolerance.is_finite() && tolerance > 0.0 && tolerance <= 1.0 {
        Ok(())
    } else {
        Err(CurveError::InvalidTolerance(tolerance))
    }
}

fn check_importance_threshold(threshold: f64) -> Result<(), CurveError> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(())
    } else {
        Err(CurveError::InvalidImportanceThreshold(threshold))
    }
}

/// Serialized form of [`CompressionParams`]. Missing fields take defaults;
/// missing weights take the data type's preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParams {
    #[serde(default = "default_tolerance")]
    tolerance: f64,
    #[serde(default = "default_importance_threshold")]
    importance_threshold: f64,
    #[serde(default = "default_method")]
    compression_method: CompressionMethod,
    #[serde(default = "default_data_type")]
    data_type: DataType,
    #[serde(default)]
    importance_weights: Option<ImportanceWeights>,
    #[serde(default)]
    point_count: Option<usize>,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_importance_threshold() -> f64 {
    DEFAULT_IMPORTANCE_THRESHOLD
}

fn default_method() -> CompressionMethod {
    CompressionMethod::RdpLinear
}

fn default_data_type() -> DataType {
    DataType::Animation
}

impl TryFrom<RawParams> for CompressionParams {
    type Error = CurveError;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        let mut params = CompressionParams::new(raw.tolerance, raw.compression_method, raw.data_type)?;
        params.set_importance_threshold(raw.importance_threshold)?;
        if let Some(weights) = raw.importance_weights {
            params.set_weights(weights)?;
        }
        params.point_count = raw.point_count;
        Ok(params)
    }
}

impl From<CompressionParams> for RawParams {
    fn from(params: CompressionParams) -> Self {
        Self {
            tolerance: params.tolerance,
            importance_threshold: params.importance_threshold,
            compression_method: params.method,
            data_type: params.data_type,
            importance_weights: Some(params.weights),
            point_count: params.point_count,
        }
    }
}
