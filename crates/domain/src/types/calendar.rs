//! Calendar event payloads exchanged with the calendar client

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Who asked for the appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeInfo {
    pub name: String,
    pub company: Option<String>,
    pub message: String,
}

/// Event to create. Start and end are wall-clock times in `timezone`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEventPayload {
    pub subject: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub timezone: Tz,
    pub attendee: AttendeeInfo,
}

impl CalendarEventPayload {
    /// Start as an absolute instant, if the local time exists exactly once
    /// in `timezone`.
    pub fn start_utc(&self) -> Option<DateTime<Utc>> {
        self.start.and_local_timezone(self.timezone).single().map(|dt| dt.with_timezone(&Utc))
    }
}

/// Identifier of a created event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventHandle {
    pub id: String,
}

impl EventHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;

    #[test]
    fn test_start_utc_resolves_in_timezone() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 10)
            .and_then(|d| d.and_hms_opt(14, 30, 0))
            .expect("valid datetime");
        let payload = CalendarEventPayload {
            subject: "Consultation".into(),
            start,
            end: start + chrono::Duration::minutes(30),
            timezone: chrono_tz::Europe::Berlin,
            attendee: AttendeeInfo { name: "Ada Lovelace".into(), company: None, message: "hi".into() },
        };
        // CEST is UTC+2 in June
        let expected = Utc.with_ymd_and_hms(2024, 6, 10, 12, 30, 0).single();
        assert_eq!(payload.start_utc(), expected);

        let json = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(json["timezone"], "Europe/Berlin");
        assert_eq!(json["start"], "2024-06-10T14:30:00");
    }
}
