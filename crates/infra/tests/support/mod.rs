//! Collaborator doubles for wiring the orchestrator to infra monitors

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use intake_common::time::MockClock;
use intake_core::{CalendarClient, EmailSender};
use intake_domain::{BoxedError, CalendarApiError, CalendarEventPayload, EventHandle};
use parking_lot::Mutex;

/// Replies with the queued status codes, then succeeds.
#[derive(Clone, Default)]
pub struct StatusCalendar {
    failures: Arc<Mutex<VecDeque<u16>>>,
}

impl StatusCalendar {
    pub fn failing_with(statuses: &[u16]) -> Self {
        Self { failures: Arc::new(Mutex::new(statuses.iter().copied().collect())) }
    }
}

#[async_trait]
impl CalendarClient for StatusCalendar {
    async fn create_event(&self, _payload: &CalendarEventPayload) -> Result<EventHandle, BoxedError> {
        match self.failures.lock().pop_front() {
            Some(status) => Err(Box::new(CalendarApiError::new(status, "calendar rejected request"))),
            None => Ok(EventHandle::new("evt-infra")),
        }
    }

    async fn test_connection(&self) -> Result<bool, BoxedError> {
        Ok(true)
    }
}

/// Accepts every message and counts them.
#[derive(Clone, Default)]
pub struct CountingEmail {
    sent: Arc<Mutex<u32>>,
}

impl CountingEmail {
    pub fn sent(&self) -> u32 {
        *self.sent.lock()
    }
}

#[async_trait]
impl EmailSender for CountingEmail {
    async fn send(&self, _subject: &str, _body: &str) -> Result<(), BoxedError> {
        *self.sent.lock() += 1;
        Ok(())
    }

    async fn probe(&self) -> Result<bool, BoxedError> {
        Ok(true)
    }
}

/// Wednesday 2024-06-05, 10:00 in Berlin.
pub fn wednesday_morning() -> MockClock {
    MockClock::at(Utc.with_ymd_and_hms(2024, 6, 5, 8, 0, 0).single().expect("valid instant"))
}

pub fn next_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).expect("valid date")
}
