//! Common types and utilities shared across domain models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp in milliseconds since Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp for the current moment
    ///
    /// If system time is somehow before UNIX_EPOCH, falls back to 0
    /// instead of panicking.
    pub fn now() -> Self {
        Self(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_else(|_| std::time::Duration::from_secs(0))
                .as_millis() as i64,
        )
    }

    /// Creates a timestamp from milliseconds since Unix epoch
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as milliseconds since Unix epoch
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Returns the timestamp as seconds since Unix epoch
    pub fn as_seconds(&self) -> i64 {
        self.0 / 1000
    }

    /// Calendar date (UTC) of this timestamp, `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "1970-01-01".to_string())
    }

    /// Human label describing how long ago this timestamp was, seen from `now`
    ///
    /// Under a minute is "just now", then minutes, then hours; anything a day
    /// or older falls back to the calendar date.
    pub fn relative_to(&self, now: Timestamp) -> String {
        let diff_secs = (now.0 - self.0).max(0) / 1000;

        if diff_secs < 60 {
            "just now".to_string()
        } else if diff_secs < 3600 {
            format!("{} min ago", diff_secs / 60)
        } else if diff_secs < 86_400 {
            format!("{} h ago", diff_secs / 3600)
        } else {
            self.date_string()
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Duration in milliseconds
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Duration(u64);

impl Duration {
    /// Zero duration constant
    pub const ZERO: Self = Self(0);

    /// Creates a duration from milliseconds
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Creates a duration from seconds
    pub fn from_seconds(seconds: u64) -> Self {
        Self(seconds * 1000)
    }

    /// Creates a duration from fractional seconds, saturating at zero
    pub fn from_secs_f64(seconds: f64) -> Self {
        if seconds.is_finite() && seconds > 0.0 {
            Self((seconds * 1000.0) as u64)
        } else {
            Self::ZERO
        }
    }

    /// Returns the duration in milliseconds
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Returns the duration in seconds
    pub fn as_seconds(&self) -> u64 {
        self.0 / 1000
    }

    /// Returns true if the duration is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Formats as M:SS, minutes are not wrapped into hours
    pub fn as_clock(&self) -> String {
        let total_seconds = self.as_seconds();
        format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_clock())
    }
}

impl From<std::time::Duration> for Duration {
    fn from(d: std::time::Duration) -> Self {
        Self(d.as_millis() as u64)
    }
}

/// Formats a playback position given in seconds as M:SS
///
/// NaN, infinite and negative inputs render as `0:00`.
pub fn format_clock(seconds: f64) -> String {
    Duration::from_secs_f64(seconds).as_clock()
}

/// Trait for types that can validate themselves
pub trait Validator {
    /// Validates the instance and returns errors if invalid
    fn validate(&self) -> Result<(), Vec<String>>;

    /// Returns true if the instance is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_now() {
        let t1 = Timestamp::now();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let t2 = Timestamp::now();
        assert!(t2 > t1);
    }

    #[test]
    fn test_timestamp_from_millis() {
        let t = Timestamp::from_millis(1234567890123);
        assert_eq!(t.as_millis(), 1234567890123);
        assert_eq!(t.as_seconds(), 1234567890);
    }

    #[test]
    fn test_timestamp_serializes_as_number() {
        let t = Timestamp::from_millis(1700000000000);
        assert_eq!(serde_json::to_string(&t).unwrap(), "1700000000000");
    }

    #[test]
    fn test_date_string() {
        // 2007-01-11T00:00:00Z
        let t = Timestamp::from_millis(1_168_473_600_000);
        assert_eq!(t.date_string(), "2007-01-11");
    }

    #[test]
    fn test_relative_labels() {
        let now = Timestamp::from_millis(10_000_000_000);
        let at = |secs_ago: i64| Timestamp::from_millis(now.as_millis() - secs_ago * 1000);

        assert_eq!(at(0).relative_to(now), "just now");
        assert_eq!(at(59).relative_to(now), "just now");
        assert_eq!(at(60).relative_to(now), "1 min ago");
        assert_eq!(at(3599).relative_to(now), "59 min ago");
        assert_eq!(at(3600).relative_to(now), "1 h ago");
        assert_eq!(at(86_399).relative_to(now), "23 h ago");
        assert_eq!(at(86_400).relative_to(now), at(86_400).date_string());
    }

    #[test]
    fn test_relative_label_future_is_just_now() {
        let now = Timestamp::from_millis(1_000_000);
        let later = Timestamp::from_millis(2_000_000);
        assert_eq!(later.relative_to(now), "just now");
    }

    #[test]
    fn test_duration_clock() {
        assert_eq!(Duration::from_seconds(0).as_clock(), "0:00");
        assert_eq!(Duration::from_seconds(65).as_clock(), "1:05");
        assert_eq!(Duration::from_seconds(3665).as_clock(), "61:05");
    }

    #[test]
    fn test_format_clock_handles_bad_input() {
        assert_eq!(format_clock(f64::NAN), "0:00");
        assert_eq!(format_clock(f64::INFINITY), "0:00");
        assert_eq!(format_clock(-3.0), "0:00");
        assert_eq!(format_clock(125.9), "2:05");
    }

    #[test]
    fn test_duration_from_std_duration() {
        let std_d = std::time::Duration::from_secs(42);
        let d: Duration = std_d.into();
        assert_eq!(d.as_seconds(), 42);
    }

    #[test]
    fn test_validator_trait() {
        struct TestType {
            value: i32,
        }

        impl Validator for TestType {
            fn validate(&self) -> Result<(), Vec<String>> {
                if self.value < 0 {
                    Err(vec!["Value must be positive".to_string()])
                } else {
                    Ok(())
                }
            }
        }

        assert!(TestType { value: 10 }.is_valid());
        assert!(!TestType { value: -5 }.is_valid());
    }
}
