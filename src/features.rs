//! Feature encoding
//!
//! This module turns raw user inputs into the positional feature vector the
//! regression model consumes:
//! - Wake time as seconds since midnight
//! - Desired sleep in hours
//! - Coffee cups as a count
//!
//! Encoding never fails and never range-checks. Out-of-range values are
//! carried through unchanged.

use crate::types::{EstimationInput, FeatureVector, WakeTime};

/// Feature encoder for building model inputs
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Encode wake time, sleep preference and coffee intake
    pub fn encode(wake: WakeTime, sleep_hours: f64, coffee_cups: i32) -> FeatureVector {
        FeatureVector {
            wake_seconds: wake.seconds_since_midnight(),
            estimated_sleep_hours: sleep_hours,
            coffee_cups: i64::from(coffee_cups),
        }
    }

    /// Encode a complete input record
    pub fn encode_input(input: &EstimationInput) -> FeatureVector {
        Self::encode(input.wake, input.sleep_hours, input.coffee_cups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_default_morning() {
        let features = FeatureEncoder::encode(WakeTime::new(7, 0), 8.0, 1);

        assert_eq!(
            features,
            FeatureVector {
                wake_seconds: 25_200,
                estimated_sleep_hours: 8.0,
                coffee_cups: 1,
            }
        );
        assert_eq!(features.as_array(), [25_200.0, 8.0, 1.0]);
    }

    #[test]
    fn test_encode_input_matches_encode() {
        let input = EstimationInput::new(WakeTime::new(6, 30), 7.25, 3);
        assert_eq!(
            FeatureEncoder::encode_input(&input),
            FeatureEncoder::encode(WakeTime::new(6, 30), 7.25, 3)
        );
    }

    #[test]
    fn test_out_of_range_values_pass_through() {
        let features = FeatureEncoder::encode(WakeTime::new(25, 75), 30.0, 0);
        // 25 * 3600 + 75 * 60
        assert_eq!(features.wake_seconds, 94_500);
        assert_eq!(features.estimated_sleep_hours, 30.0);
        assert_eq!(features.coffee_cups, 0);

        let features = FeatureEncoder::encode(WakeTime::new(-1, -30), -2.5, -4);
        assert_eq!(features.wake_seconds, -5_400);
        assert_eq!(features.estimated_sleep_hours, -2.5);
        assert_eq!(features.coffee_cups, -4);
    }

    #[test]
    fn test_extreme_integers_do_not_overflow() {
        let features = FeatureEncoder::encode(WakeTime::new(i32::MAX, i32::MAX), 4.0, i32::MAX);
        let expected = i64::from(i32::MAX) * 3600 + i64::from(i32::MAX) * 60;
        assert_eq!(features.wake_seconds, expected);
        assert_eq!(features.coffee_cups, i64::from(i32::MAX));
    }

    #[test]
    fn test_non_finite_sleep_hours_pass_through() {
        let features = FeatureEncoder::encode(WakeTime::new(7, 0), f64::NAN, 1);
        assert!(features.estimated_sleep_hours.is_nan());
    }
}
