use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use intake_common::time::MockClock;
use intake_core::SubmissionOrchestrator;
use intake_domain::{AppConfig, AppointmentFormData, ContactFormData};

use super::calendar::ScriptedCalendarClient;
use super::email::RecordingEmailSender;
use super::monitoring::RecordingMonitor;

/// Wednesday 2024-06-05, 10:00 in Berlin.
pub fn wednesday_morning() -> MockClock {
    MockClock::at(Utc.with_ymd_and_hms(2024, 6, 5, 8, 0, 0).single().expect("valid instant"))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Monday after [`wednesday_morning`].
pub fn next_monday() -> NaiveDate {
    date(2024, 6, 10)
}

pub fn yesterday() -> NaiveDate {
    date(2024, 6, 4)
}

pub fn contact() -> ContactFormData {
    ContactFormData::new("Ada", "Lovelace", "I would like to discuss a project.")
        .with_company("Analytical Engines")
}

pub fn appointment(date: NaiveDate, time: &str) -> AppointmentFormData {
    AppointmentFormData::new(contact(), date, time)
}

/// Orchestrator wired to the given doubles and a recording monitor.
pub struct Harness {
    pub orchestrator: SubmissionOrchestrator,
    pub calendar: ScriptedCalendarClient,
    pub email: RecordingEmailSender,
    pub monitor: RecordingMonitor,
    pub clock: MockClock,
}

impl Harness {
    pub fn new(calendar: ScriptedCalendarClient, email: RecordingEmailSender) -> Self {
        Self::with_config(&AppConfig::default(), calendar, email)
    }

    pub fn with_config(
        config: &AppConfig,
        calendar: ScriptedCalendarClient,
        email: RecordingEmailSender,
    ) -> Self {
        let clock = wednesday_morning();
        let monitor = RecordingMonitor::default();
        let orchestrator = SubmissionOrchestrator::with_clock(
            config,
            Arc::new(calendar.clone()),
            Arc::new(email.clone()),
            Arc::new(clock.clone()),
        )
        .with_monitor(Arc::new(monitor.clone()));
        Self { orchestrator, calendar, email, monitor, clock }
    }
}
