//! Integration tests for the monitoring adapters
//!
//! Drives real submissions through the orchestrator with a fan-out of the
//! tracing and metrics monitors attached.

mod support;

use std::sync::Arc;

use intake_core::{MonitoringFacade, SubmissionOrchestrator};
use intake_domain::{AppConfig, AppointmentFormData, ContactFormData, FailureCode};
use intake_infra::{FanoutMonitor, MetricsMonitor, TracingMonitor};
use support::{next_monday, wednesday_morning, CountingEmail, StatusCalendar};

fn wire(calendar: StatusCalendar, email: CountingEmail) -> (SubmissionOrchestrator, Arc<MetricsMonitor>) {
    let metrics = Arc::new(MetricsMonitor::new());
    let fanout = FanoutMonitor::new()
        .with(Arc::new(TracingMonitor::new()))
        .with(metrics.clone() as Arc<dyn MonitoringFacade>);
    let orchestrator = SubmissionOrchestrator::with_clock(
        &AppConfig::default(),
        Arc::new(calendar),
        Arc::new(email),
        Arc::new(wednesday_morning()),
    )
    .with_monitor(Arc::new(fanout));
    (orchestrator, metrics)
}

fn contact() -> ContactFormData {
    ContactFormData::new("Grace", "Hopper", "Compiler consultation")
}

/// Validates that retried calendar attempts and the final outcome are
/// aggregated.
///
/// # Test Steps
/// 1. Calendar answers 503 twice, then creates the event
/// 2. Submit a valid appointment
/// 3. Confirm three api calls, two failures of kind `api`, one success
#[tokio::test(start_paused = true)]
async fn test_retried_booking_is_aggregated() {
    let email = CountingEmail::default();
    let (orchestrator, metrics) = wire(StatusCalendar::failing_with(&[503, 503]), email.clone());

    let form = AppointmentFormData::new(contact(), next_monday(), "14:30");
    let result = orchestrator.submit_appointment(&form).await;

    assert!(result.success());
    assert_eq!(result.event_id(), Some("evt-infra"));
    assert_eq!(email.sent(), 0);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.api_calls, 3);
    assert_eq!(snapshot.api_failures, 2);
    assert_eq!(snapshot.api_failures_by_kind.get("api"), Some(&2));
    assert_eq!(snapshot.submissions, 1);
    assert_eq!(snapshot.submission_failures, 0);
    assert_eq!(metrics.latency_samples(), 3);
}

/// Validates that an authentication failure produces a security event and
/// a fallback email, both visible in the metrics.
#[tokio::test(start_paused = true)]
async fn test_auth_failure_counts_security_event() {
    let email = CountingEmail::default();
    let (orchestrator, metrics) = wire(StatusCalendar::failing_with(&[401]), email.clone());

    let form = AppointmentFormData::new(contact(), next_monday(), "15:00");
    let result = orchestrator.submit_appointment(&form).await;

    assert!(result.success());
    assert_eq!(email.sent(), 1);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.security_events, 1);
    assert_eq!(snapshot.security_by_name.get("calendar_authentication_failure"), Some(&1));
    assert_eq!(snapshot.api_by_endpoint["calendar.events.create"].failed, 1);
    assert_eq!(snapshot.api_by_endpoint["email.send"].succeeded, 1);
    assert_eq!(snapshot.submissions_by_kind["email_fallback"].succeeded, 1);
}

/// Validates that rejected input is counted with its failure code and
/// makes no api calls.
#[tokio::test]
async fn test_rejection_is_counted_without_api_calls() {
    let (orchestrator, metrics) = wire(StatusCalendar::default(), CountingEmail::default());

    let form = AppointmentFormData::new(contact(), next_monday(), "09:00");
    let result = orchestrator.submit_appointment(&form).await;

    assert_eq!(result.error(), Some(FailureCode::OutsideBusinessHours));

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.api_calls, 0);
    assert_eq!(snapshot.submission_failures, 1);
    assert_eq!(snapshot.submission_errors.get("OUTSIDE_BUSINESS_HOURS"), Some(&1));
}

#[tokio::test]
async fn test_message_path_is_counted() {
    let email = CountingEmail::default();
    let (orchestrator, metrics) = wire(StatusCalendar::default(), email.clone());

    let result = orchestrator.submit_message(&contact()).await;

    assert!(result.success());
    assert_eq!(email.sent(), 1);
    assert_eq!(metrics.snapshot().submissions_by_kind["message"].succeeded, 1);
}
