//! Regression model artifact
//!
//! The sleep model is a linear regression trained offline and shipped as a
//! small versioned JSON document:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "name": "SleepCalculator",
//!   "version": "1.0.0",
//!   "output_unit": "seconds",
//!   "features": [
//!     { "name": "wake", "weight": -0.01 },
//!     { "name": "estimatedSleep", "weight": 3600.0 },
//!     { "name": "coffee", "weight": 900.0 }
//!   ],
//!   "bias": 300.0
//! }
//! ```
//!
//! Features are listed positionally and must match [`FeatureVector::NAMES`].
//! Coefficients are private to this module and the predictor that owns the
//! loaded model.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::InitializationError;
use crate::types::FeatureVector;

/// Supported model artifact format version
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// The model packaged with the library
pub const PACKAGED_MODEL_JSON: &str = include_str!("../models/sleep_calculator.json");

/// Unit of the model's raw output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[default]
    Seconds,
    Hours,
}

impl DurationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Seconds => "seconds",
            DurationUnit::Hours => "hours",
        }
    }

    /// Convert a raw model output in this unit to seconds
    pub fn to_seconds(self, value: f64) -> f64 {
        match self {
            DurationUnit::Seconds => value,
            DurationUnit::Hours => value * 3600.0,
        }
    }
}

/// Where to load the model from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// The artifact compiled into the library
    Packaged,
    /// A JSON artifact on disk
    Path(PathBuf),
    /// A JSON artifact already in memory
    Json(String),
}

impl ModelSource {
    /// Load and validate the model
    pub fn load(&self) -> Result<RegressionModel, InitializationError> {
        match self {
            ModelSource::Packaged => RegressionModel::from_json(PACKAGED_MODEL_JSON),
            ModelSource::Path(path) => RegressionModel::from_path(path),
            ModelSource::Json(json) => RegressionModel::from_json(json),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ModelSource::Packaged => "packaged".to_string(),
            ModelSource::Path(path) => path.display().to_string(),
            ModelSource::Json(_) => "inline json".to_string(),
        }
    }
}

/// On-disk shape of a model artifact
#[derive(Debug, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    name: String,
    version: String,
    #[serde(default)]
    output_unit: DurationUnit,
    features: Vec<FeatureWeight>,
    bias: f64,
}

#[derive(Debug, Deserialize)]
struct FeatureWeight {
    name: String,
    weight: f64,
}

/// Descriptive metadata for a loaded model. Carries no coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub output_unit: DurationUnit,
    pub features: Vec<String>,
}

/// Immutable linear regression: `Σ(weight_i * feature_i) + bias`
#[derive(Debug, Clone)]
pub struct RegressionModel {
    name: String,
    version: String,
    output_unit: DurationUnit,
    weights: [f64; FeatureVector::LEN],
    bias: f64,
}

impl RegressionModel {
    /// Parse and validate a model artifact
    pub fn from_json(json: &str) -> Result<Self, InitializationError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    /// Read, parse and validate a model artifact from disk
    pub fn from_path(path: &Path) -> Result<Self, InitializationError> {
        if !path.exists() {
            return Err(InitializationError::ModelNotFound(path.to_path_buf()));
        }
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn from_artifact(artifact: ModelArtifact) -> Result<Self, InitializationError> {
        if artifact.format_version != MODEL_FORMAT_VERSION {
            return Err(InitializationError::UnsupportedFormat(
                artifact.format_version,
            ));
        }

        if artifact.features.len() != FeatureVector::LEN {
            return Err(InitializationError::SchemaMismatch(format!(
                "expected {} features, found {}",
                FeatureVector::LEN,
                artifact.features.len()
            )));
        }

        let mut weights = [0.0; FeatureVector::LEN];
        for (i, (feature, expected)) in artifact
            .features
            .iter()
            .zip(FeatureVector::NAMES)
            .enumerate()
        {
            if feature.name != expected {
                return Err(InitializationError::SchemaMismatch(format!(
                    "feature {} is '{}', expected '{}'",
                    i, feature.name, expected
                )));
            }
            if !feature.weight.is_finite() {
                return Err(InitializationError::NonFiniteCoefficient {
                    name: feature.name.clone(),
                    value: feature.weight,
                });
            }
            weights[i] = feature.weight;
        }

        if !artifact.bias.is_finite() {
            return Err(InitializationError::NonFiniteCoefficient {
                name: "bias".to_string(),
                value: artifact.bias,
            });
        }

        Ok(Self {
            name: artifact.name,
            version: artifact.version,
            output_unit: artifact.output_unit,
            weights,
            bias: artifact.bias,
        })
    }

    /// Raw model output, in [`Self::output_unit`]
    pub(crate) fn evaluate(&self, features: &FeatureVector) -> f64 {
        self.weights
            .iter()
            .zip(features.as_array())
            .fold(self.bias, |acc, (w, x)| acc + w * x)
    }

    pub fn output_unit(&self) -> DurationUnit {
        self.output_unit
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            name: self.name.clone(),
            version: self.version.clone(),
            output_unit: self.output_unit,
            features: FeatureVector::NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Build a model artifact for tests
#[cfg(test)]
pub(crate) fn model_json(weights: [f64; 3], bias: f64, unit: DurationUnit) -> String {
    serde_json::json!({
        "format_version": MODEL_FORMAT_VERSION,
        "name": "TestModel",
        "version": "0.0.1",
        "output_unit": unit.as_str(),
        "features": [
            { "name": "wake", "weight": weights[0] },
            { "name": "estimatedSleep", "weight": weights[1] },
            { "name": "coffee", "weight": weights[2] }
        ],
        "bias": bias
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn features(wake_seconds: i64, hours: f64, cups: i64) -> FeatureVector {
        FeatureVector {
            wake_seconds,
            estimated_sleep_hours: hours,
            coffee_cups: cups,
        }
    }

    #[test]
    fn test_packaged_model_loads() {
        let model = ModelSource::Packaged.load().unwrap();
        let info = model.info();

        assert_eq!(info.name, "SleepCalculator");
        assert_eq!(info.output_unit, DurationUnit::Seconds);
        assert_eq!(info.features, vec!["wake", "estimatedSleep", "coffee"]);
    }

    #[test]
    fn test_packaged_model_evaluation() {
        let model = ModelSource::Packaged.load().unwrap();
        // -0.01 * 25200 + 3600 * 8 + 900 * 1 + 300
        let raw = model.evaluate(&features(25_200, 8.0, 1));
        assert!((raw - 29_748.0).abs() < 1e-6);
    }

    #[test]
    fn test_evaluate_weighted_sum_plus_bias() {
        let json = model_json([1.0, 10.0, 100.0], 5.0, DurationUnit::Hours);
        let model = RegressionModel::from_json(&json).unwrap();

        assert_eq!(model.evaluate(&features(2, 3.0, 4)), 2.0 + 30.0 + 400.0 + 5.0);
        assert_eq!(model.output_unit(), DurationUnit::Hours);
    }

    #[test]
    fn test_output_unit_defaults_to_seconds() {
        let json = r#"{
            "format_version": 1,
            "name": "m",
            "version": "1",
            "features": [
                { "name": "wake", "weight": 0.0 },
                { "name": "estimatedSleep", "weight": 0.0 },
                { "name": "coffee", "weight": 0.0 }
            ],
            "bias": 0.0
        }"#;
        let model = RegressionModel::from_json(json).unwrap();
        assert_eq!(model.output_unit(), DurationUnit::Seconds);
    }

    #[test]
    fn test_reordered_features_rejected() {
        let json = r#"{
            "format_version": 1,
            "name": "m",
            "version": "1",
            "features": [
                { "name": "estimatedSleep", "weight": 1.0 },
                { "name": "wake", "weight": 1.0 },
                { "name": "coffee", "weight": 1.0 }
            ],
            "bias": 0.0
        }"#;
        let err = RegressionModel::from_json(json).unwrap_err();
        assert!(matches!(err, InitializationError::SchemaMismatch(_)));
        assert!(err.to_string().contains("expected 'wake'"));
    }

    #[test]
    fn test_wrong_feature_count_rejected() {
        let json = r#"{
            "format_version": 1,
            "name": "m",
            "version": "1",
            "features": [{ "name": "wake", "weight": 1.0 }],
            "bias": 0.0
        }"#;
        let err = RegressionModel::from_json(json).unwrap_err();
        assert!(matches!(err, InitializationError::SchemaMismatch(_)));
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let json = model_json([0.0, 1.0, 0.0], 0.0, DurationUnit::Hours)
            .replace("\"format_version\":1", "\"format_version\":2");
        let err = RegressionModel::from_json(&json).unwrap_err();
        assert!(matches!(err, InitializationError::UnsupportedFormat(2)));
    }

    #[test]
    fn test_corrupt_json_rejected() {
        let err = RegressionModel::from_json("{ not json").unwrap_err();
        assert!(matches!(err, InitializationError::JsonError(_)));
    }

    #[test]
    fn test_missing_file_rejected() {
        let path = Path::new("/definitely/not/here/sleep_calculator.json");
        let err = RegressionModel::from_path(path).unwrap_err();
        assert!(matches!(err, InitializationError::ModelNotFound(_)));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = model_json([0.0, 1.0, 0.0], 0.0, DurationUnit::Hours);
        file.write_all(json.as_bytes()).unwrap();

        let model = ModelSource::Path(file.path().to_path_buf()).load().unwrap();
        assert_eq!(model.info().name, "TestModel");
    }
}
