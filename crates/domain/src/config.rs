//! Runtime configuration
//!
//! Constructed once at startup (see the infra config loader) and shared
//! read-only for the process lifetime.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ERROR_LOG_CAPACITY;
use crate::errors::{IntakeError, Result};
use crate::types::ErrorKind;
use crate::utils::serde::{duration_millis, format_hhmm, hhmm};

/// Weekday number with 0 = Sunday … 6 = Saturday.
pub fn weekday_number(weekday: Weekday) -> u8 {
    // num_days_from_sunday is always 0..=6
    weekday.num_days_from_sunday() as u8
}

/// Bookable weekdays and time-of-day window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHoursConfig {
    /// Timezone the window and requested slots are interpreted in.
    pub timezone: Tz,
    /// Weekday numbers (0 = Sunday).
    pub working_days: BTreeSet<u8>,
    /// Inclusive start of the window.
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// Exclusive end of the window.
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub slot_duration_minutes: u32,
}

impl Default for BusinessHoursConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Berlin,
            working_days: (1..=5).collect(),
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap_or(NaiveTime::MIN),
            end_time: NaiveTime::from_hms_opt(16, 30, 0).unwrap_or(NaiveTime::MIN),
            slot_duration_minutes: 30,
        }
    }
}

impl BusinessHoursConfig {
    /// Whether `date` falls on a configured working day.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.working_days.contains(&weekday_number(date.weekday()))
    }

    /// Whether `time` lies in `[start_time, end_time)`.
    pub fn contains_time(&self, time: NaiveTime) -> bool {
        self.start_time <= time && time < self.end_time
    }

    pub fn slot_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.slot_duration_minutes))
    }

    /// Human-readable rejection text citing the window and weekdays.
    pub fn describe_window(&self) -> String {
        crate::constants::messages::outside_business_hours(
            self.working_days.iter().copied(),
            &format_hhmm(self.start_time),
            &format_hhmm(self.end_time),
            self.timezone.name(),
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.working_days.is_empty() {
            return Err(IntakeError::Config("working_days must not be empty".into()));
        }
        if let Some(day) = self.working_days.iter().find(|d| **d > 6) {
            return Err(IntakeError::Config(format!(
                "working day {day} out of range (0 = Sunday .. 6 = Saturday)"
            )));
        }
        if self.start_time >= self.end_time {
            return Err(IntakeError::Config(format!(
                "start_time {} must be before end_time {}",
                format_hhmm(self.start_time),
                format_hhmm(self.end_time)
            )));
        }
        if self.slot_duration_minutes == 0 {
            return Err(IntakeError::Config("slot_duration_minutes must be positive".into()));
        }
        Ok(())
    }
}

/// Retry behaviour for one downstream path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    #[serde(with = "duration_millis", rename = "base_delay_ms")]
    pub base_delay: Duration,
    #[serde(with = "duration_millis", rename = "max_delay_ms")]
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Kinds eligible for another attempt.
    pub retryable_kinds: BTreeSet<ErrorKind>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            backoff_multiplier: 2.0,
            retryable_kinds: [ErrorKind::Network, ErrorKind::Api].into_iter().collect(),
        }
    }
}

impl RetryConfig {
    /// Whether `kind` is in the retryable set.
    pub fn allows(&self, kind: ErrorKind) -> bool {
        self.retryable_kinds.contains(&kind)
    }

    pub fn validate(&self) -> Result<()> {
        if self.backoff_multiplier.is_nan() || self.backoff_multiplier < 1.0 {
            return Err(IntakeError::Config(format!(
                "backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            )));
        }
        if self.base_delay > self.max_delay {
            return Err(IntakeError::Config(format!(
                "base_delay ({} ms) exceeds max_delay ({} ms)",
                self.base_delay.as_millis(),
                self.max_delay.as_millis()
            )));
        }
        Ok(())
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

/// Top-level configuration for the submission pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub business_hours: BusinessHoursConfig,
    pub calendar_retry: RetryConfig,
    pub email_retry: RetryConfig,
    /// Entries kept in the classifier's diagnostic log.
    pub error_log_capacity: usize,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            business_hours: BusinessHoursConfig::default(),
            calendar_retry: RetryConfig::default(),
            email_retry: RetryConfig::default(),
            error_log_capacity: DEFAULT_ERROR_LOG_CAPACITY,
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.business_hours.validate()?;
        self.calendar_retry.validate()?;
        self.email_retry.validate()?;
        if self.error_log_capacity == 0 {
            return Err(IntakeError::Config("error_log_capacity must be positive".into()));
        }
        Ok(())
    }
}
