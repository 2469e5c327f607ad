//! Submission orchestration - core business logic
//!
//! Appointment path: validate, create the calendar event under retry, fall
//! back to email when the calendar path gives up. Message path: validate,
//! send email under retry. Every terminal branch reports exactly one
//! form-submission event; every downstream attempt reports one API-call
//! event.

use std::sync::Arc;

use chrono::NaiveDateTime;
use intake_common::time::{Clock, SystemClock};
use intake_domain::constants::{
    messages, API_METHOD_GET, API_METHOD_POST, APPOINTMENT_SUBJECT, CALENDAR_CREATE_ENDPOINT,
    CALENDAR_PROBE_ENDPOINT, EMAIL_PROBE_ENDPOINT, EMAIL_SEND_ENDPOINT, OP_CREATE_CALENDAR_EVENT,
    OP_SEND_FALLBACK_EMAIL, OP_SEND_MESSAGE_EMAIL, OP_VALIDATE_APPOINTMENT, OP_VALIDATE_MESSAGE,
    SECURITY_EVENT_CALENDAR_AUTH,
};
use intake_domain::{
    ApiCallRecord, AppConfig, AppointmentFormData, AttendeeInfo, BoxedError,
    CalendarEventPayload, ConnectivityReport, ContactFormData, ErrorKind, ErrorSeverity,
    EventHandle, FailureCode, FormSubmissionRecord, RetryConfig, SecurityEvent, SubmissionKind,
    SubmissionResult,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::email::{self, OutgoingEmail};
use super::ports::{CalendarClient, EmailSender};
use crate::errors::{calendar_status, ErrorClassifier, RetryEngine, RetryFailure};
use crate::monitoring_ports::{MonitoringFacade, NoopMonitor};
use crate::validation::BusinessHoursValidator;

/// Why a submission was rejected before any downstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Rejection {
    code: FailureCode,
    kind: ErrorKind,
    message: String,
}

impl Rejection {
    fn rule(code: FailureCode, message: impl Into<String>) -> Self {
        Self { code, kind: ErrorKind::BusinessLogic, message: message.into() }
    }
}

/// Ties validation, calendar booking, email fallback and monitoring into
/// one pipeline.
///
/// Stateless per call; share one instance behind an `Arc`.
pub struct SubmissionOrchestrator {
    validator: BusinessHoursValidator,
    retry: RetryEngine,
    calendar: Arc<dyn CalendarClient>,
    email: Arc<dyn EmailSender>,
    monitor: Arc<dyn MonitoringFacade>,
    calendar_retry: RetryConfig,
    email_retry: RetryConfig,
}

impl SubmissionOrchestrator {
    /// Orchestrator reading the system clock and discarding monitoring
    /// events.
    pub fn new(
        config: &AppConfig,
        calendar: Arc<dyn CalendarClient>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self::with_clock(config, calendar, email, Arc::new(SystemClock))
    }

    /// Orchestrator whose validator and classifier read `clock`.
    pub fn with_clock(
        config: &AppConfig,
        calendar: Arc<dyn CalendarClient>,
        email: Arc<dyn EmailSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let classifier =
            Arc::new(ErrorClassifier::with_clock(config.error_log_capacity, Arc::clone(&clock)));
        Self {
            validator: BusinessHoursValidator::with_clock(config.business_hours.clone(), clock),
            retry: RetryEngine::new(classifier, config.calendar_retry.clone()),
            calendar,
            email,
            monitor: Arc::new(NoopMonitor),
            calendar_retry: config.calendar_retry.clone(),
            email_retry: config.email_retry.clone(),
        }
    }

    /// Report to `monitor` instead of discarding events.
    #[must_use]
    pub fn with_monitor(mut self, monitor: Arc<dyn MonitoringFacade>) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn classifier(&self) -> &Arc<ErrorClassifier> {
        self.retry.classifier()
    }

    pub fn validator(&self) -> &BusinessHoursValidator {
        &self.validator
    }

    /// Book an appointment, falling back to email when the calendar path
    /// fails. Runs to completion.
    pub async fn submit_appointment(&self, form: &AppointmentFormData) -> SubmissionResult {
        self.run_appointment(form, None).await
    }

    /// Like [`Self::submit_appointment`], but stops retrying once
    /// `cancellation` fires. A cancelled calendar attempt does not fall
    /// back to email.
    pub async fn submit_appointment_with_cancellation(
        &self,
        form: &AppointmentFormData,
        cancellation: &CancellationToken,
    ) -> SubmissionResult {
        self.run_appointment(form, Some(cancellation)).await
    }

    /// Deliver a contact message by email. No calendar interaction.
    pub async fn submit_message(&self, form: &ContactFormData) -> SubmissionResult {
        self.run_message(form, None).await
    }

    pub async fn submit_message_with_cancellation(
        &self,
        form: &ContactFormData,
        cancellation: &CancellationToken,
    ) -> SubmissionResult {
        self.run_message(form, Some(cancellation)).await
    }

    /// Probe both downstream paths concurrently. A failing probe never
    /// hides the other's result.
    #[instrument(skip(self))]
    pub async fn test_connectivity(&self) -> ConnectivityReport {
        let (calendar, email) = tokio::join!(self.probe_calendar(), self.probe_email());
        let report = ConnectivityReport { calendar, email };
        info!(calendar = report.calendar, email = report.email, "Connectivity checked");
        report
    }

    #[instrument(skip_all, fields(kind = "appointment"))]
    async fn run_appointment(
        &self,
        form: &AppointmentFormData,
        cancellation: Option<&CancellationToken>,
    ) -> SubmissionResult {
        let started = Instant::now();

        let payload = match self.validate_appointment(form) {
            Ok(payload) => payload,
            Err(rejection) => return self.reject(started, SubmissionKind::Appointment, rejection),
        };

        let calendar_failure = match self.create_event(&payload, cancellation).await {
            Ok(handle) => {
                info!(event_id = %handle.id, "Calendar event created");
                return self.finish(started, SubmissionResult::appointment_booked(handle.id), Vec::new());
            }
            Err(failure) => failure,
        };

        let mut errors: Vec<String> =
            calendar_failure.kind().map(|kind| kind.to_string()).into_iter().collect();

        if calendar_failure.is_cancelled() {
            errors.push(FailureCode::Cancelled.to_string());
            let result = SubmissionResult::failed(
                SubmissionKind::Appointment,
                FailureCode::Cancelled,
                messages::CANCELLED,
            );
            return self.finish(started, result, errors);
        }

        warn!(
            kind = ?calendar_failure.kind(),
            attempts = calendar_failure.attempts(),
            "Calendar path failed, falling back to email"
        );
        let fallback = email::appointment_fallback(&payload, calendar_failure.kind());
        let result = match self.send_email(&fallback, OP_SEND_FALLBACK_EMAIL, cancellation).await {
            Ok(()) => SubmissionResult::fallback_delivered(),
            Err(email_failure) => {
                errors.extend(email_failure.kind().map(|kind| kind.to_string()));
                let code = if email_failure.is_cancelled() {
                    FailureCode::Cancelled
                } else {
                    FailureCode::DeliveryFailed
                };
                errors.push(code.to_string());
                let message =
                    if email_failure.is_cancelled() { messages::CANCELLED } else { messages::DELIVERY_FAILED };
                SubmissionResult::failed(SubmissionKind::EmailFallback, code, message)
            }
        };
        self.finish(started, result, errors)
    }

    #[instrument(skip_all, fields(kind = "message"))]
    async fn run_message(
        &self,
        form: &ContactFormData,
        cancellation: Option<&CancellationToken>,
    ) -> SubmissionResult {
        let started = Instant::now();

        if let Some(field) = form.missing_field() {
            let rejection = Rejection::rule(field.failure_code(), field.user_message());
            return self.reject_as(started, SubmissionKind::Message, rejection, OP_VALIDATE_MESSAGE);
        }

        let outgoing = email::contact_message(form);
        let failure = match self.send_email(&outgoing, OP_SEND_MESSAGE_EMAIL, cancellation).await {
            Ok(()) => return self.finish(started, SubmissionResult::message_sent(), Vec::new()),
            Err(failure) => failure,
        };

        let mut errors: Vec<String> = failure.kind().map(|kind| kind.to_string()).into_iter().collect();
        let (code, message) = if failure.is_cancelled() {
            (FailureCode::Cancelled, messages::CANCELLED.to_string())
        } else {
            (FailureCode::DeliveryFailed, failure.user_message().to_string())
        };
        errors.push(code.to_string());
        self.finish(started, SubmissionResult::failed(SubmissionKind::Message, code, message), errors)
    }

    /// Rules in order: required fields, past date, time format, working
    /// window, local-time resolution, combined instant.
    fn validate_appointment(
        &self,
        form: &AppointmentFormData,
    ) -> Result<CalendarEventPayload, Rejection> {
        if let Some(field) = form.missing_field() {
            return Err(Rejection::rule(field.failure_code(), field.user_message()));
        }
        let Some(date) = form.date else {
            return Err(Rejection::rule(FailureCode::MissingDate, messages::MISSING_DATE));
        };
        let time_str = form.time_str();

        if self.validator.is_date_in_past(date) {
            return Err(Rejection::rule(FailureCode::DateInPast, messages::DATE_IN_PAST));
        }

        let Some(time) = self.validator.parse_time(time_str) else {
            return Err(Rejection {
                code: FailureCode::InvalidTime,
                kind: ErrorKind::Validation,
                message: messages::INVALID_TIME.to_string(),
            });
        };

        let outside_hours =
            || Rejection::rule(FailureCode::OutsideBusinessHours, self.validator.config().describe_window());

        if !self.validator.is_valid_business_datetime(date, time_str) {
            return Err(outside_hours());
        }

        let Some(start_utc) = self.validator.resolve_slot(date, time) else {
            return Err(outside_hours());
        };
        if !self.validator.is_valid_business_datetime_object(start_utc) {
            if self.validator.is_in_past(start_utc) {
                return Err(Rejection::rule(FailureCode::DateInPast, messages::DATE_IN_PAST));
            }
            return Err(outside_hours());
        }

        let start = NaiveDateTime::new(date, time);
        let contact = &form.contact;
        Ok(CalendarEventPayload {
            subject: APPOINTMENT_SUBJECT.to_string(),
            start,
            end: start + self.validator.config().slot_duration(),
            timezone: self.validator.timezone(),
            attendee: AttendeeInfo {
                name: contact.full_name(),
                company: contact.company_name().map(str::to_string),
                message: contact.message.trim().to_string(),
            },
        })
    }

    async fn create_event(
        &self,
        payload: &CalendarEventPayload,
        cancellation: Option<&CancellationToken>,
    ) -> Result<EventHandle, RetryFailure> {
        let context = self.classifier().context(OP_CREATE_CALENDAR_EVENT);
        let operation = |attempt: u32| async move {
            let started = Instant::now();
            let result = self.calendar.create_event(payload).await;
            self.report_calendar_attempt(attempt, started, result.as_ref().err());
            result
        };

        match cancellation {
            Some(token) => {
                self.retry
                    .with_retry_cancellable(operation, context, Some(&self.calendar_retry), token)
                    .await
            }
            None => self.retry.with_retry(operation, context, Some(&self.calendar_retry)).await,
        }
    }

    async fn send_email(
        &self,
        outgoing: &OutgoingEmail,
        operation_name: &str,
        cancellation: Option<&CancellationToken>,
    ) -> Result<(), RetryFailure> {
        let context = self.classifier().context(operation_name);
        let operation = |attempt: u32| async move {
            let started = Instant::now();
            let result = self.email.send(&outgoing.subject, &outgoing.body).await;
            self.report_attempt(EMAIL_SEND_ENDPOINT, API_METHOD_POST, attempt, started, result.as_ref().err());
            result
        };

        match cancellation {
            Some(token) => {
                self.retry
                    .with_retry_cancellable(operation, context, Some(&self.email_retry), token)
                    .await
            }
            None => self.retry.with_retry(operation, context, Some(&self.email_retry)).await,
        }
    }

    async fn probe_calendar(&self) -> bool {
        let started = Instant::now();
        let result = self.calendar.test_connection().await;
        self.report_attempt(CALENDAR_PROBE_ENDPOINT, API_METHOD_GET, 0, started, result.as_ref().err());
        self.probe_outcome(result, CALENDAR_PROBE_ENDPOINT)
    }

    async fn probe_email(&self) -> bool {
        let started = Instant::now();
        let result = self.email.probe().await;
        self.report_attempt(EMAIL_PROBE_ENDPOINT, API_METHOD_GET, 0, started, result.as_ref().err());
        self.probe_outcome(result, EMAIL_PROBE_ENDPOINT)
    }

    fn probe_outcome(&self, result: Result<bool, BoxedError>, endpoint: &str) -> bool {
        match result {
            Ok(healthy) => healthy,
            Err(err) => {
                let info = self.classifier().classify(&*err, self.classifier().context(endpoint));
                warn!(endpoint, kind = %info.kind, "Connectivity probe failed");
                false
            }
        }
    }

    fn report_calendar_attempt(&self, attempt: u32, started: Instant, error: Option<&BoxedError>) {
        self.report_attempt(CALENDAR_CREATE_ENDPOINT, API_METHOD_POST, attempt, started, error);

        let Some(error) = error else { return };
        let classification = self.classifier().categorize(&**error);
        if classification.kind == ErrorKind::Authentication {
            let details = classification
                .status_code
                .map_or_else(|| "credential failure".to_string(), |code| format!("status {code}"));
            self.monitor.record_security_event(&SecurityEvent {
                name: SECURITY_EVENT_CALENDAR_AUTH.to_string(),
                severity: ErrorSeverity::High,
                details: Some(details),
            });
        }
    }

    fn report_attempt(
        &self,
        endpoint: &str,
        method: &str,
        attempt: u32,
        started: Instant,
        error: Option<&BoxedError>,
    ) {
        let duration_ms = elapsed_ms(started);
        let record = match error {
            None => ApiCallRecord::success(endpoint, method, duration_ms),
            Some(error) => {
                let kind = self.classifier().categorize(&**error).kind;
                debug!(endpoint, attempt, %kind, duration_ms, "Downstream attempt failed");
                ApiCallRecord::failure(endpoint, method, duration_ms, calendar_status(&**error), kind)
            }
        };
        self.monitor.record_api_call(&record);
    }

    fn reject(&self, started: Instant, kind: SubmissionKind, rejection: Rejection) -> SubmissionResult {
        self.reject_as(started, kind, rejection, OP_VALIDATE_APPOINTMENT)
    }

    fn reject_as(
        &self,
        started: Instant,
        kind: SubmissionKind,
        rejection: Rejection,
        operation: &str,
    ) -> SubmissionResult {
        let context = self
            .classifier()
            .context(operation)
            .with_metadata("failure_code", rejection.code.as_str());
        self.classifier().classify_kind(
            rejection.kind,
            format!("{kind} submission rejected: {}", rejection.code),
            context,
        );
        let result = SubmissionResult::failed(kind, rejection.code, rejection.message);
        self.finish(started, result, vec![rejection.code.to_string()])
    }

    fn finish(&self, started: Instant, result: SubmissionResult, errors: Vec<String>) -> SubmissionResult {
        let duration_ms = elapsed_ms(started);
        info!(
            kind = %result.kind(),
            success = result.success(),
            error = ?result.error(),
            duration_ms,
            "Submission finished"
        );
        self.monitor.record_form_submission(&FormSubmissionRecord {
            kind: result.kind(),
            duration_ms,
            success: result.success(),
            errors,
        });
        result
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
