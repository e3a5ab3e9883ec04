//! BetterRest - On-device bedtime estimation
//!
//! BetterRest recommends a bedtime from a desired wake-up time, a sleep goal
//! and daily coffee intake through a deterministic pipeline: feature
//! encoding → linear regression → wall-clock subtraction with wraparound.
//!
//! ## Modules
//!
//! - **Engine**: load the sleep model once and serve estimates from a handle
//! - **Display**: text and input bounds for the form around the engine
//! - **FFI**: C bindings for mobile callers

pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod features;
pub mod model;
pub mod predictor;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::EngineConfig;
pub use engine::{estimate_bedtime, initialize, BedtimeEngine, EstimationReport};
pub use error::{EstimationError, InitializationError};
pub use features::FeatureEncoder;
pub use model::{DurationUnit, ModelInfo, ModelSource, RegressionModel};
pub use predictor::SleepPredictor;
pub use types::{
    BedtimeResult, EngineState, EstimationInput, FeatureVector, PredictedSleepDuration,
    TimeOfDay, WakeTime,
};

/// Library version
pub const BETTERREST_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI
pub const PRODUCER_NAME: &str = "betterrest";
