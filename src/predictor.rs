//! Sleep prediction and bedtime arithmetic
//!
//! The predictor owns the loaded regression model. It turns a feature
//! vector into a predicted amount of actual sleep and subtracts that from
//! the wake time on a 24-hour clock.

use crate::error::EstimationError;
use crate::model::{ModelInfo, RegressionModel};
use crate::types::{
    BedtimeResult, FeatureVector, PredictedSleepDuration, TimeOfDay, WakeTime, SECONDS_PER_DAY,
};

/// Predicts actual sleep from encoded inputs
#[derive(Debug)]
pub struct SleepPredictor {
    model: RegressionModel,
}

impl SleepPredictor {
    /// Take ownership of a loaded model
    pub fn new(model: RegressionModel) -> Self {
        Self { model }
    }

    /// Predict the amount of actual sleep for a feature vector
    pub fn predict(
        &self,
        features: &FeatureVector,
    ) -> Result<PredictedSleepDuration, EstimationError> {
        let raw = self.model.evaluate(features);
        let seconds = self.model.output_unit().to_seconds(raw);

        if !seconds.is_finite() {
            return Err(EstimationError::NonFinitePrediction { value: raw });
        }

        Ok(PredictedSleepDuration::from_seconds(seconds))
    }

    /// Predict sleep and subtract it from the wake time
    pub fn estimate_bedtime(&self, wake: WakeTime, features: &FeatureVector) -> BedtimeResult {
        let duration = self.predict(features)?;
        Ok(subtract_wrapping(wake, duration))
    }

    pub fn model_info(&self) -> ModelInfo {
        self.model.info()
    }
}

/// Subtract a duration from a wake time, wrapping backwards past midnight.
///
/// Fractional seconds round toward the earlier instant.
pub fn subtract_wrapping(wake: WakeTime, duration: PredictedSleepDuration) -> TimeOfDay {
    let bedtime = wake.seconds_since_midnight() as f64 - duration.as_seconds();
    let wrapped = bedtime.rem_euclid(SECONDS_PER_DAY as f64).floor();
    // rem_euclid may round up to exactly one day; from_seconds folds that to 00:00
    TimeOfDay::from_seconds_since_midnight(wrapped as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureEncoder;
    use crate::model::{model_json, DurationUnit};

    /// Predicts exactly the requested sleep, in hours
    fn echo_predictor() -> SleepPredictor {
        let json = model_json([0.0, 1.0, 0.0], 0.0, DurationUnit::Hours);
        SleepPredictor::new(RegressionModel::from_json(&json).unwrap())
    }

    fn constant_predictor(seconds: f64) -> SleepPredictor {
        let json = model_json([0.0, 0.0, 0.0], seconds, DurationUnit::Seconds);
        SleepPredictor::new(RegressionModel::from_json(&json).unwrap())
    }

    #[test]
    fn test_eight_hours_before_seven_is_eleven_pm() {
        let predictor = echo_predictor();
        let wake = WakeTime::new(7, 0);
        let features = FeatureEncoder::encode(wake, 8.0, 1);

        let predicted = predictor.predict(&features).unwrap();
        assert_eq!(predicted.as_hours(), 8.0);

        let bedtime = predictor.estimate_bedtime(wake, &features).unwrap();
        assert_eq!(bedtime, TimeOfDay::hm(23, 0));
    }

    #[test]
    fn test_same_day_subtraction() {
        let bedtime = subtract_wrapping(
            WakeTime::new(14, 30),
            PredictedSleepDuration::from_hours(1.5),
        );
        assert_eq!(bedtime, TimeOfDay::hm(13, 0));
    }

    #[test]
    fn test_wraparound_law() {
        // Whenever the duration reaches back past midnight the hour wraps modulo 24
        for (wake_hour, hours) in [(0, 0.5), (1, 2.0), (3, 3.0), (5, 12.0), (6, 23.75)] {
            let wake = WakeTime::new(wake_hour, 0);
            let duration = PredictedSleepDuration::from_hours(hours);
            assert!(duration.as_seconds() >= wake.seconds_since_midnight() as f64);

            let bedtime = subtract_wrapping(wake, duration);
            let expected = (wake.seconds_since_midnight() as f64 - duration.as_seconds())
                .rem_euclid(86_400.0) as i64;
            assert_eq!(bedtime.seconds_since_midnight(), expected);
        }

        assert_eq!(
            subtract_wrapping(WakeTime::new(3, 0), PredictedSleepDuration::from_hours(3.0)),
            TimeOfDay::hm(0, 0)
        );
        assert_eq!(
            subtract_wrapping(WakeTime::new(1, 0), PredictedSleepDuration::from_hours(2.0)),
            TimeOfDay::hm(23, 0)
        );
    }

    #[test]
    fn test_durations_longer_than_a_day_wrap() {
        let bedtime = subtract_wrapping(
            WakeTime::new(7, 0),
            PredictedSleepDuration::from_hours(32.0),
        );
        assert_eq!(bedtime, TimeOfDay::hm(23, 0));
    }

    #[test]
    fn test_negative_duration_is_not_clamped() {
        let bedtime = subtract_wrapping(
            WakeTime::new(23, 0),
            PredictedSleepDuration::from_hours(-2.0),
        );
        assert_eq!(bedtime, TimeOfDay::hm(1, 0));
    }

    #[test]
    fn test_fractional_seconds_floor() {
        let bedtime = subtract_wrapping(
            WakeTime::new(0, 0),
            PredictedSleepDuration::from_seconds(0.5),
        );
        assert_eq!(
            (bedtime.hour, bedtime.minute, bedtime.second),
            (23, 59, 59)
        );
    }

    #[test]
    fn test_packaged_model_scenario() {
        let model = crate::model::ModelSource::Packaged.load().unwrap();
        let predictor = SleepPredictor::new(model);
        let wake = WakeTime::new(7, 0);
        let features = FeatureEncoder::encode(wake, 8.0, 1);

        // 29748 s = 8h 15m 48s; 07:00:00 - 8:15:48 = 22:44:12
        let bedtime = predictor.estimate_bedtime(wake, &features).unwrap();
        assert_eq!(
            (bedtime.hour, bedtime.minute, bedtime.second),
            (22, 44, 12)
        );
    }

    #[test]
    fn test_non_finite_prediction_is_an_error() {
        let predictor = echo_predictor();
        let wake = WakeTime::new(7, 0);
        let features = FeatureEncoder::encode(wake, f64::INFINITY, 1);

        let err = predictor.estimate_bedtime(wake, &features).unwrap_err();
        assert!(matches!(err, EstimationError::NonFinitePrediction { .. }));

        let features = FeatureEncoder::encode(wake, f64::NAN, 1);
        assert!(predictor.predict(&features).is_err());
    }

    #[test]
    fn test_huge_finite_prediction_still_yields_a_time() {
        let predictor = constant_predictor(1e300);
        let wake = WakeTime::new(7, 0);
        let features = FeatureEncoder::encode(wake, 8.0, 1);

        let bedtime = predictor.estimate_bedtime(wake, &features).unwrap();
        assert!(bedtime.hour < 24 && bedtime.minute < 60);
    }
}
