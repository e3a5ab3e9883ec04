//! Error types for BetterRest

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the regression model.
///
/// Any of these is fatal for the engine instance that hit it: the engine
/// either is never constructed or is constructed in the `Unusable` state.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Model artifact not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported model format version: {0}")]
    UnsupportedFormat(u32),

    #[error("Model schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Non-finite coefficient for {name}: {value}")]
    NonFiniteCoefficient { name: String, value: f64 },
}

/// Errors returned by a single bedtime estimation.
///
/// Always recoverable by the caller: show a placeholder and try again on
/// the next input change.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    #[error("Model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("Model produced a non-finite prediction: {value}")]
    NonFinitePrediction { value: f64 },
}
