//! Business-hours rules for appointment slots
//!
//! All checks are pure given the configuration and the injected clock.
//! Dates and times of day are interpreted in the configured timezone.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use intake_common::time::{Clock, SystemClock};
use intake_domain::utils::parse_hhmm;
use intake_domain::{weekday_number, BusinessHoursConfig};
/// Evaluates whether a requested slot is bookable.
pub struct BusinessHoursValidator {
    config: BusinessHoursConfig,
    clock: Arc<dyn Clock>,
}

impl BusinessHoursValidator {
    /// Validator reading the system clock.
    pub fn new(config: BusinessHoursConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Validator reading `clock`.
    pub fn with_clock(config: BusinessHoursConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Read-only view of the configuration.
    pub fn config(&self) -> &BusinessHoursConfig {
        &self.config
    }

    pub fn timezone(&self) -> Tz {
        self.config.timezone
    }

    /// `true` iff `datetime` is strictly earlier than now.
    pub fn is_in_past(&self, datetime: DateTime<Utc>) -> bool {
        datetime < self.clock.now()
    }

    /// `true` iff `date` is before today in the business timezone.
    pub fn is_date_in_past(&self, date: NaiveDate) -> bool {
        date < self.today()
    }

    /// Current calendar date in the business timezone.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.config.timezone).date_naive()
    }

    /// `true` iff `date` falls on a configured working day.
    pub fn is_valid_business_day(&self, date: NaiveDate) -> bool {
        self.config.is_working_day(date)
    }

    /// `true` iff `time` is a well-formed `HH:MM` inside `[start, end)`.
    ///
    /// Malformed input yields `false`.
    pub fn is_valid_business_time(&self, time: &str) -> bool {
        self.parse_time(time).is_some_and(|t| self.config.contains_time(t))
    }

    /// Conjunction of the day and time checks.
    pub fn is_valid_business_datetime(&self, date: NaiveDate, time: &str) -> bool {
        self.is_valid_business_day(date) && self.is_valid_business_time(time)
    }

    /// Full check of a combined instant: not in the past, on a working day,
    /// inside the window.
    ///
    /// The weekday is checked twice on purpose; each check must hold on its
    /// own.
    pub fn is_valid_business_datetime_object(&self, datetime: DateTime<Utc>) -> bool {
        if self.is_in_past(datetime) {
            return false;
        }
        let local = datetime.with_timezone(&self.config.timezone);
        let date = local.date_naive();
        let time = local.time();

        let component_checks =
            self.is_valid_business_day(date) && self.config.contains_time(time);
        let weekday_allowed = self.config.working_days.contains(&weekday_number(local.weekday()));

        component_checks && weekday_allowed
    }

    /// Parse a strict `HH:MM` string.
    pub fn parse_time(&self, time: &str) -> Option<NaiveTime> {
        parse_hhmm(time)
    }

    /// Resolve a local slot start to an absolute instant.
    ///
    /// Returns `None` for local times that are skipped or repeated by a
    /// DST transition.
    pub fn resolve_slot(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        NaiveDateTime::new(date, time)
            .and_local_timezone(self.config.timezone)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl std::fmt::Debug for BusinessHoursValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessHoursValidator").field("config", &self.config).finish_non_exhaustive()
    }
}
