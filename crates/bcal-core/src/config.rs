//! Pipeline tuning knobs and their validation.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for every duration and window: seven days.
pub const MAX_WINDOW_MINUTES: i64 = 7 * 24 * 60;

/// Validation errors for configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// An hour-of-day outside `0..24`.
    #[error("{field} must be an hour between 0 and 23, got {value}")]
    HourOutOfRange { field: &'static str, value: u32 },

    /// A duration or window that must be strictly positive.
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    /// A duration or window beyond [`MAX_WINDOW_MINUTES`].
    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        value: f64,
        max: f64,
    },
}

/// What to do with a row whose timestamp cannot be parsed or is out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
    /// Stop the run at the first bad row.
    #[default]
    Abort,
    /// Drop the row, log a warning and carry on.
    Skip,
}

/// Configuration for coalescing and next-rest prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// How long the subject is expected to stay awake before resting.
    /// Default: 2.5 hours.
    pub awake_duration_hours: f64,

    /// Predictions at or after this hour are night sleeps. Default: 22.
    pub bedtime_hour: u32,

    /// Predictions before this hour are night sleeps. Default: 10.
    pub waketime_hour: u32,

    /// Feeds starting within this many minutes of the open feed's first
    /// occurrence are merged into it. Default: 60.
    pub eat_coalesce_window_minutes: i64,

    /// A wake closes the open sleep only if it is within this many hours of
    /// the sleep's start. Default: 24.
    pub sleep_coalesce_window_hours: i64,

    /// Reject rows whose timestamp precedes the previous row. Default: true.
    pub reject_out_of_order: bool,

    /// Handling for unparseable or out-of-order rows. Default: abort.
    pub on_row_error: RowErrorPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            awake_duration_hours: 2.5,
            bedtime_hour: 22,
            waketime_hour: 10,
            eat_coalesce_window_minutes: 60,
            sleep_coalesce_window_hours: 24,
            reject_out_of_order: true,
            on_row_error: RowErrorPolicy::Abort,
        }
    }
}

impl PipelineConfig {
    /// Checks every field is within its meaningful range.
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("bedtime_hour", self.bedtime_hour),
            ("waketime_hour", self.waketime_hour),
        ] {
            if value >= 24 {
                return Err(ValidationError::HourOutOfRange { field, value });
            }
        }

        let max_hours = (MAX_WINDOW_MINUTES / 60) as f64;
        for (field, value, max) in [
            ("awake_duration_hours", self.awake_duration_hours, max_hours),
            (
                "eat_coalesce_window_minutes",
                self.eat_coalesce_window_minutes as f64,
                MAX_WINDOW_MINUTES as f64,
            ),
            (
                "sleep_coalesce_window_hours",
                self.sleep_coalesce_window_hours as f64,
                max_hours,
            ),
        ] {
            // NaN fails both comparisons, so test for it explicitly.
            if value.is_nan() || value <= 0.0 {
                return Err(ValidationError::NotPositive { field, value });
            }
            if value > max {
                return Err(ValidationError::TooLarge { field, value, max });
            }
        }

        Ok(())
    }

    /// Expected awake stretch, rounded to the minute.
    ///
    /// Unvalidated values are clamped into `0..=MAX_WINDOW_MINUTES`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn awake_duration(&self) -> Duration {
        // Float-to-int casts saturate, and NaN becomes 0.
        bounded_minutes((self.awake_duration_hours * 60.0).round() as i64)
    }

    pub fn eat_window(&self) -> Duration {
        bounded_minutes(self.eat_coalesce_window_minutes)
    }

    pub fn sleep_window(&self) -> Duration {
        bounded_minutes(self.sleep_coalesce_window_hours.saturating_mul(60))
    }
}

fn bounded_minutes(minutes: i64) -> Duration {
    Duration::minutes(minutes.clamp(0, MAX_WINDOW_MINUTES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.awake_duration(), Duration::minutes(150));
        assert_eq!(config.eat_window(), Duration::minutes(60));
        assert_eq!(config.sleep_window(), Duration::hours(24));
    }

    #[test]
    fn rejects_hour_out_of_range() {
        let config = PipelineConfig {
            bedtime_hour: 24,
            ..PipelineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::HourOutOfRange {
                field: "bedtime_hour",
                value: 24
            })
        );
    }

    #[test]
    fn rejects_non_positive_durations() {
        let config = PipelineConfig {
            awake_duration_hours: 0.0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            eat_coalesce_window_minutes: -5,
            ..PipelineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "eat_coalesce_window_minutes must be positive, got -5"
        );
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"bedtime_hour": 21, "on_row_error": "skip"}"#).unwrap();
        assert_eq!(config.bedtime_hour, 21);
        assert_eq!(config.on_row_error, RowErrorPolicy::Skip);
        assert_eq!(config.waketime_hour, 10);
    }

    #[test]
    fn rejects_infinite_and_oversized_values() {
        let config = PipelineConfig {
            awake_duration_hours: f64::INFINITY,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::TooLarge {
                field: "awake_duration_hours",
                ..
            })
        ));

        let config = PipelineConfig {
            awake_duration_hours: f64::NAN,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::NotPositive { .. })
        ));

        let config = PipelineConfig {
            eat_coalesce_window_minutes: i64::MAX,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::TooLarge {
                field: "eat_coalesce_window_minutes",
                ..
            })
        ));

        let config = PipelineConfig {
            sleep_coalesce_window_hours: 169,
            ..PipelineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "sleep_coalesce_window_hours must be at most 168, got 169"
        );
    }

    #[test]
    fn week_long_windows_are_accepted() {
        let config = PipelineConfig {
            awake_duration_hours: 168.0,
            eat_coalesce_window_minutes: MAX_WINDOW_MINUTES,
            sleep_coalesce_window_hours: 168,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.sleep_window(), Duration::days(7));
    }

    #[test]
    fn unvalidated_extremes_are_clamped() {
        let config = PipelineConfig {
            awake_duration_hours: f64::INFINITY,
            eat_coalesce_window_minutes: i64::MAX,
            sleep_coalesce_window_hours: i64::MIN,
            ..PipelineConfig::default()
        };
        assert_eq!(config.awake_duration(), Duration::days(7));
        assert_eq!(config.eat_window(), Duration::days(7));
        assert_eq!(config.sleep_window(), Duration::zero());
    }
}
