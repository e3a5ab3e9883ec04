//! Core types for the BetterRest engine
//!
//! This module defines the values that flow through an estimation: the raw
//! user inputs, the encoded feature vector, the predicted sleep duration and
//! the resulting time-of-day.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::EstimationError;

/// Seconds in one wall-clock day
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Default wake-up time shown by the input form (07:00)
pub const DEFAULT_WAKE_HOUR: i32 = 7;
pub const DEFAULT_WAKE_MINUTE: i32 = 0;

/// Default desired sleep in hours
pub const DEFAULT_SLEEP_HOURS: f64 = 8.0;

/// Default daily coffee intake in cups
pub const DEFAULT_COFFEE_CUPS: i32 = 1;

/// Result of one bedtime estimation
pub type BedtimeResult = Result<TimeOfDay, EstimationError>;

/// Desired wake-up time as a wall-clock hour and minute.
///
/// Components are stored as given. Nothing here rejects `hour = 25`;
/// range enforcement belongs to whoever collects the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeTime {
    pub hour: i32,
    pub minute: i32,
}

impl WakeTime {
    pub fn new(hour: i32, minute: i32) -> Self {
        Self { hour, minute }
    }

    /// Build from optional components; a missing component counts as 0
    pub fn from_components(hour: Option<i32>, minute: Option<i32>) -> Self {
        Self {
            hour: hour.unwrap_or(0),
            minute: minute.unwrap_or(0),
        }
    }

    /// Seconds elapsed since midnight (`hour * 3600 + minute * 60`)
    pub fn seconds_since_midnight(&self) -> i64 {
        i64::from(self.hour) * 3600 + i64::from(self.minute) * 60
    }
}

impl Default for WakeTime {
    fn default() -> Self {
        Self::new(DEFAULT_WAKE_HOUR, DEFAULT_WAKE_MINUTE)
    }
}

impl std::fmt::Display for WakeTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl From<NaiveTime> for WakeTime {
    fn from(time: NaiveTime) -> Self {
        // Seconds are dropped: the form only picks hour and minute.
        Self::new(time.hour() as i32, time.minute() as i32)
    }
}

/// One set of user inputs for an estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimationInput {
    /// Desired wake-up time
    pub wake: WakeTime,
    /// Desired amount of sleep (hours, nominally 4.0 - 12.0 in 0.25 steps)
    pub sleep_hours: f64,
    /// Daily coffee intake (cups, nominally 1 - 20)
    pub coffee_cups: i32,
}

impl EstimationInput {
    pub fn new(wake: WakeTime, sleep_hours: f64, coffee_cups: i32) -> Self {
        Self {
            wake,
            sleep_hours,
            coffee_cups,
        }
    }
}

impl Default for EstimationInput {
    fn default() -> Self {
        Self::new(WakeTime::default(), DEFAULT_SLEEP_HOURS, DEFAULT_COFFEE_CUPS)
    }
}

/// Numeric encoding of an [`EstimationInput`] in model order.
///
/// The field order is `wake`, `estimatedSleep`, `coffee`. The regression
/// model was trained on exactly this order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Wake time as seconds since midnight
    pub wake_seconds: i64,
    /// Desired sleep (hours)
    pub estimated_sleep_hours: f64,
    /// Coffee intake (cups)
    pub coffee_cups: i64,
}

impl FeatureVector {
    /// Feature names in positional order
    pub const NAMES: [&'static str; 3] = ["wake", "estimatedSleep", "coffee"];

    /// Number of features the model consumes
    pub const LEN: usize = Self::NAMES.len();

    /// Features as model inputs, in positional order
    pub fn as_array(&self) -> [f64; FeatureVector::LEN] {
        [
            self.wake_seconds as f64,
            self.estimated_sleep_hours,
            self.coffee_cups as f64,
        ]
    }
}

/// Predicted amount of actual sleep, held in seconds.
///
/// Never clamped. A negative or oversized value reaches the time
/// arithmetic unchanged.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PredictedSleepDuration {
    seconds: f64,
}

impl PredictedSleepDuration {
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    pub fn from_hours(hours: f64) -> Self {
        Self {
            seconds: hours * 3600.0,
        }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    pub fn as_hours(&self) -> f64 {
        self.seconds / 3600.0
    }
}

/// A wall-clock time of day on a 24-hour clock. The date is not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl TimeOfDay {
    /// Normalize any second count onto the 24-hour clock (modulo one day)
    pub fn from_seconds_since_midnight(seconds: i64) -> Self {
        let secs = seconds.rem_euclid(SECONDS_PER_DAY) as u32;
        Self {
            hour: secs / 3600,
            minute: (secs % 3600) / 60,
            second: secs % 60,
        }
    }

    pub fn hm(hour: u32, minute: u32) -> Self {
        Self::from_seconds_since_midnight(i64::from(hour) * 3600 + i64::from(minute) * 60)
    }

    pub fn seconds_since_midnight(&self) -> i64 {
        i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        // Fields are always in range after normalization.
        NaiveTime::from_hms_opt(self.hour, self.minute, self.second).unwrap_or(NaiveTime::MIN)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Observable engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    /// Model loaded; estimates are served
    Ready,
    /// Model failed to load; every estimate fails fast
    Unusable,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Ready => "ready",
            EngineState::Unusable => "unusable",
        }
    }
}
