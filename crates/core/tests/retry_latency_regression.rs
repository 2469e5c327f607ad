//! Regression tests for cumulative retry latency
//!
//! The retry loop has no overall deadline: total wall time is the sum of
//! the backoff schedule plus every attempt's own duration. These tests pin
//! that behaviour so any change to it is deliberate.

mod support;

use std::time::Duration;

use intake_core::errors::backoff_for;
use intake_domain::{AppConfig, RetryConfig, SubmissionKind};
use support::calendar::{CalendarReply, ScriptedCalendarClient};
use support::email::RecordingEmailSender;
use support::fixtures::{appointment, next_monday, Harness};

/// A typical reverse-proxy request timeout.
const TYPICAL_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Validates the documented delay schedule for the default configuration.
#[test]
fn test_default_schedule_worst_case() {
    let backoff = backoff_for(&RetryConfig::default());
    assert_eq!(backoff.worst_case_total(3), Duration::from_millis(7000));
}

/// Flags the latency risk: with generous retry settings a single
/// submission can sleep far longer than a request timeout before the email
/// fallback even starts.
#[tokio::test(start_paused = true)]
async fn test_max_delay_chain_exceeds_request_timeout() {
    let retry = RetryConfig { max_retries: 10, ..RetryConfig::default() };
    let config = AppConfig { calendar_retry: retry.clone(), ..AppConfig::default() };
    let h = Harness::with_config(
        &config,
        ScriptedCalendarClient::always(CalendarReply::Status(502)),
        RecordingEmailSender::working(),
    );
    let started = tokio::time::Instant::now();

    let result = h.orchestrator.submit_appointment(&appointment(next_monday(), "14:30")).await;

    // 1 + 2 + 4 + 8 + 10 * 6 seconds
    let expected = backoff_for(&retry).worst_case_total(10);
    assert_eq!(expected, Duration::from_secs(75));
    assert_eq!(started.elapsed(), expected);
    assert!(started.elapsed() > TYPICAL_REQUEST_TIMEOUT);

    assert_eq!(h.calendar.calls(), 11);
    assert_eq!(result.kind(), SubmissionKind::EmailFallback);
    assert!(result.success());
}
