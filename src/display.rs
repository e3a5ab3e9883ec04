//! Presentation helpers
//!
//! Text and bounds the input form uses around the engine. Nothing in the
//! estimation path calls into this module.

use serde::{Deserialize, Serialize};

use crate::types::{BedtimeResult, EstimationInput};

/// Heading shown above the bedtime
pub const BEDTIME_HEADLINE: &str = "Your ideal bedtime is…";

/// Shown before the first estimate has been made
pub const BEDTIME_PLACEHOLDER: &str = "00:00";

/// Shown when an estimate fails
pub const ESTIMATION_FALLBACK: &str = "Error calculating bedtime";

/// How to render a time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockStyle {
    /// `22:44`
    #[default]
    TwentyFourHour,
    /// `10:44 PM`
    TwelveHour,
}

impl ClockStyle {
    fn pattern(&self) -> &'static str {
        match self {
            ClockStyle::TwentyFourHour => "%H:%M",
            ClockStyle::TwelveHour => "%-I:%M %p",
        }
    }
}

/// Render the outcome of an estimation for display.
///
/// `None` means nothing has been estimated yet.
pub fn render_bedtime(result: Option<&BedtimeResult>, style: ClockStyle) -> String {
    match result {
        None => BEDTIME_PLACEHOLDER.to_string(),
        Some(Ok(bedtime)) => bedtime.to_naive_time().format(style.pattern()).to_string(),
        Some(Err(_)) => ESTIMATION_FALLBACK.to_string(),
    }
}

/// `"1 cup"`, `"3 cups"`
pub fn cups_label(cups: i32) -> String {
    if cups == 1 {
        "1 cup".to_string()
    } else {
        format!("{} cups", cups)
    }
}

/// `"8 hours"`, `"7.25 hours"`
pub fn hours_label(hours: f64) -> String {
    format!("{} hours", hours)
}

/// A way an input falls outside what the form offers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum InputViolation {
    WakeHour { value: i32 },
    WakeMinute { value: i32 },
    SleepHours { value: f64 },
    SleepHoursStep { value: f64 },
    CoffeeCups { value: i32 },
}

impl std::fmt::Display for InputViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputViolation::WakeHour { value } => write!(f, "wake hour {} is outside 0-23", value),
            InputViolation::WakeMinute { value } => {
                write!(f, "wake minute {} is outside 0-59", value)
            }
            InputViolation::SleepHours { value } => {
                write!(f, "sleep amount {} is outside the allowed range", value)
            }
            InputViolation::SleepHoursStep { value } => {
                write!(f, "sleep amount {} is not a multiple of the step", value)
            }
            InputViolation::CoffeeCups { value } => {
                write!(f, "coffee intake {} is outside the allowed range", value)
            }
        }
    }
}

/// Ranges the input form enforces. The engine itself accepts anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputBounds {
    pub min_sleep_hours: f64,
    pub max_sleep_hours: f64,
    pub sleep_step_hours: f64,
    pub min_coffee_cups: i32,
    pub max_coffee_cups: i32,
}

impl Default for InputBounds {
    fn default() -> Self {
        Self {
            min_sleep_hours: 4.0,
            max_sleep_hours: 12.0,
            sleep_step_hours: 0.25,
            min_coffee_cups: 1,
            max_coffee_cups: 20,
        }
    }
}

impl InputBounds {
    /// List every way `input` falls outside these bounds
    pub fn check(&self, input: &EstimationInput) -> Vec<InputViolation> {
        let mut violations = Vec::new();

        if !(0..24).contains(&input.wake.hour) {
            violations.push(InputViolation::WakeHour {
                value: input.wake.hour,
            });
        }
        if !(0..60).contains(&input.wake.minute) {
            violations.push(InputViolation::WakeMinute {
                value: input.wake.minute,
            });
        }

        let hours = input.sleep_hours;
        if !(self.min_sleep_hours..=self.max_sleep_hours).contains(&hours) {
            violations.push(InputViolation::SleepHours { value: hours });
        } else if self.sleep_step_hours > 0.0 {
            let steps = (hours - self.min_sleep_hours) / self.sleep_step_hours;
            if (steps - steps.round()).abs() > 1e-9 {
                violations.push(InputViolation::SleepHoursStep { value: hours });
            }
        }

        if !(self.min_coffee_cups..=self.max_coffee_cups).contains(&input.coffee_cups) {
            violations.push(InputViolation::CoffeeCups {
                value: input.coffee_cups,
            });
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EstimationError;
    use crate::types::{TimeOfDay, WakeTime};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_states() {
        assert_eq!(render_bedtime(None, ClockStyle::TwentyFourHour), "00:00");

        let ok: BedtimeResult = Ok(TimeOfDay::hm(22, 44));
        assert_eq!(render_bedtime(Some(&ok), ClockStyle::TwentyFourHour), "22:44");
        assert_eq!(render_bedtime(Some(&ok), ClockStyle::TwelveHour), "10:44 PM");

        let err: BedtimeResult = Err(EstimationError::ModelUnavailable {
            reason: "missing".to_string(),
        });
        assert_eq!(
            render_bedtime(Some(&err), ClockStyle::TwelveHour),
            "Error calculating bedtime"
        );
    }

    #[test]
    fn test_twelve_hour_morning() {
        let ok: BedtimeResult = Ok(TimeOfDay::hm(0, 5));
        assert_eq!(render_bedtime(Some(&ok), ClockStyle::TwelveHour), "12:05 AM");
    }

    #[test]
    fn test_labels() {
        assert_eq!(cups_label(1), "1 cup");
        assert_eq!(cups_label(2), "2 cups");
        assert_eq!(hours_label(8.0), "8 hours");
        assert_eq!(hours_label(7.25), "7.25 hours");
    }

    #[test]
    fn test_defaults_within_bounds() {
        assert!(InputBounds::default()
            .check(&EstimationInput::default())
            .is_empty());
    }

    #[test]
    fn test_bounds_report_each_violation() {
        let input = EstimationInput::new(WakeTime::new(24, 60), 12.5, 0);
        let violations = InputBounds::default().check(&input);

        assert_eq!(
            violations,
            vec![
                InputViolation::WakeHour { value: 24 },
                InputViolation::WakeMinute { value: 60 },
                InputViolation::SleepHours { value: 12.5 },
                InputViolation::CoffeeCups { value: 0 },
            ]
        );
    }

    #[test]
    fn test_sleep_step() {
        let bounds = InputBounds::default();
        let on_step = EstimationInput::new(WakeTime::new(7, 0), 7.75, 1);
        let off_step = EstimationInput::new(WakeTime::new(7, 0), 7.8, 1);

        assert!(bounds.check(&on_step).is_empty());
        assert_eq!(
            bounds.check(&off_step),
            vec![InputViolation::SleepHoursStep { value: 7.8 }]
        );
        assert!(bounds
            .check(&EstimationInput::new(WakeTime::new(7, 0), 12.0, 20))
            .is_empty());
    }
}
