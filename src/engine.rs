//! Engine orchestration
//!
//! This module provides the public API for BetterRest. It ties the feature
//! encoder and the sleep predictor together behind an explicit engine handle.
//!
//! An engine is created exactly once per session. Construction loads the
//! model; after that the engine is either `Ready` for its whole lifetime or,
//! if loading failed, permanently `Unusable`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EstimationError, InitializationError};
use crate::features::FeatureEncoder;
use crate::model::{ModelInfo, ModelSource};
use crate::predictor::{subtract_wrapping, SleepPredictor};
use crate::types::{
    BedtimeResult, EngineState, EstimationInput, FeatureVector, TimeOfDay, WakeTime,
};

/// Load the packaged model and return a ready engine.
///
/// # Example
/// ```
/// use betterrest::{initialize, estimate_bedtime, WakeTime};
///
/// let engine = initialize()?;
/// let bedtime = estimate_bedtime(&engine, WakeTime::new(7, 0), 8.0, 1)?;
/// assert!(bedtime.hour < 24);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn initialize() -> Result<BedtimeEngine, InitializationError> {
    BedtimeEngine::from_source(&ModelSource::Packaged)
}

/// Estimate a bedtime with an engine handle.
///
/// # Arguments
/// * `engine` - Engine returned by [`initialize`] or a `BedtimeEngine` constructor
/// * `wake` - Desired wake-up time
/// * `sleep_hours` - Desired amount of sleep in hours
/// * `coffee_cups` - Daily coffee intake
pub fn estimate_bedtime(
    engine: &BedtimeEngine,
    wake: WakeTime,
    sleep_hours: f64,
    coffee_cups: i32,
) -> BedtimeResult {
    engine.estimate_bedtime(wake, sleep_hours, coffee_cups)
}

#[derive(Debug, Clone)]
enum Inner {
    Ready(Arc<SleepPredictor>),
    Unusable(Arc<str>),
}

/// Explicit handle to a bedtime estimation engine.
///
/// Cloning is cheap and clones share the same immutable model.
#[derive(Debug, Clone)]
pub struct BedtimeEngine {
    instance_id: String,
    inner: Inner,
}

impl BedtimeEngine {
    /// Load a model and return a ready engine
    pub fn from_source(source: &ModelSource) -> Result<Self, InitializationError> {
        let model = source.load()?;
        let instance_id = Uuid::new_v4().to_string();
        let model_info = model.info();

        info!(
            engine = %instance_id,
            source = %source.describe(),
            model = %model_info.name,
            version = %model_info.version,
            "Sleep model loaded"
        );

        Ok(Self {
            instance_id,
            inner: Inner::Ready(Arc::new(SleepPredictor::new(model))),
        })
    }

    /// Load the model selected by a configuration
    pub fn from_config(config: &EngineConfig) -> Result<Self, InitializationError> {
        Self::from_source(&config.model_source())
    }

    /// Load a model, falling back to an `Unusable` engine on failure.
    ///
    /// Use this when the caller wants a handle regardless and will render a
    /// placeholder for every estimate the engine cannot serve.
    pub fn load_or_unusable(source: &ModelSource) -> Self {
        match Self::from_source(source) {
            Ok(engine) => engine,
            Err(e) => {
                let instance_id = Uuid::new_v4().to_string();
                warn!(
                    engine = %instance_id,
                    source = %source.describe(),
                    error = %e,
                    "Sleep model failed to load; engine is unusable"
                );
                Self {
                    instance_id,
                    inner: Inner::Unusable(Arc::from(e.to_string())),
                }
            }
        }
    }

    pub fn state(&self) -> EngineState {
        match self.inner {
            Inner::Ready(_) => EngineState::Ready,
            Inner::Unusable(_) => EngineState::Unusable,
        }
    }

    /// Unique id of this engine, used to correlate logs and reports
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Why the model failed to load, if it did
    pub fn unusable_reason(&self) -> Option<&str> {
        match &self.inner {
            Inner::Ready(_) => None,
            Inner::Unusable(reason) => Some(&**reason),
        }
    }

    /// Metadata of the loaded model
    pub fn model_info(&self) -> Option<ModelInfo> {
        match &self.inner {
            Inner::Ready(predictor) => Some(predictor.model_info()),
            Inner::Unusable(_) => None,
        }
    }

    /// Estimate a bedtime from raw inputs
    pub fn estimate_bedtime(
        &self,
        wake: WakeTime,
        sleep_hours: f64,
        coffee_cups: i32,
    ) -> BedtimeResult {
        let predictor = self.predictor()?;
        let features = FeatureEncoder::encode(wake, sleep_hours, coffee_cups);
        let result = predictor.estimate_bedtime(wake, &features);

        debug!(
            engine = %self.instance_id,
            wake_seconds = features.wake_seconds,
            sleep_hours,
            coffee_cups,
            ok = result.is_ok(),
            "Bedtime estimated"
        );

        result
    }

    /// Estimate a bedtime from an input record
    pub fn estimate(&self, input: &EstimationInput) -> BedtimeResult {
        self.estimate_bedtime(input.wake, input.sleep_hours, input.coffee_cups)
    }

    /// Estimate a bedtime and keep every intermediate value
    pub fn report(&self, input: &EstimationInput) -> Result<EstimationReport, EstimationError> {
        let predictor = self.predictor()?;
        let features = FeatureEncoder::encode_input(input);
        let predicted = predictor.predict(&features)?;
        let bedtime = subtract_wrapping(input.wake, predicted);
        let model = predictor.model_info();

        Ok(EstimationReport {
            engine_id: self.instance_id.clone(),
            model_name: model.name,
            model_version: model.version,
            input: *input,
            features,
            predicted_sleep_seconds: predicted.as_seconds(),
            bedtime,
            computed_at_utc: Utc::now(),
        })
    }

    fn predictor(&self) -> Result<&SleepPredictor, EstimationError> {
        match &self.inner {
            Inner::Ready(predictor) => Ok(&**predictor),
            Inner::Unusable(reason) => Err(EstimationError::ModelUnavailable {
                reason: reason.to_string(),
            }),
        }
    }
}

/// Full trace of a single estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationReport {
    pub engine_id: String,
    pub model_name: String,
    pub model_version: String,
    pub input: EstimationInput,
    pub features: FeatureVector,
    pub predicted_sleep_seconds: f64,
    pub bedtime: TimeOfDay,
    pub computed_at_utc: DateTime<Utc>,
}
