//! Structured-log monitor
//!
//! Each facade call becomes exactly one `tracing` event under the
//! `intake::monitor` target. Level follows outcome: successes at debug or
//! info, failures at warn, security events by severity.

use intake_core::MonitoringFacade;
use intake_domain::{ApiCallRecord, ErrorSeverity, FormSubmissionRecord, SecurityEvent};
use tracing::{debug, error, info, warn};

const TARGET: &str = "intake::monitor";

/// Writes monitoring events to the active `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMonitor;

impl TracingMonitor {
    pub fn new() -> Self {
        Self
    }
}

impl MonitoringFacade for TracingMonitor {
    fn record_api_call(&self, record: &ApiCallRecord) {
        if record.success {
            debug!(
                target: TARGET,
                endpoint = %record.endpoint,
                method = %record.method,
                duration_ms = record.duration_ms,
                "api call succeeded"
            );
        } else {
            warn!(
                target: TARGET,
                endpoint = %record.endpoint,
                method = %record.method,
                duration_ms = record.duration_ms,
                status_code = record.status_code,
                error_kind = record.error.map(|kind| kind.as_str()),
                "api call failed"
            );
        }
    }

    fn record_form_submission(&self, record: &FormSubmissionRecord) {
        let errors = record.errors.join(",");
        if record.success {
            info!(
                target: TARGET,
                kind = %record.kind,
                duration_ms = record.duration_ms,
                "submission completed"
            );
        } else {
            warn!(
                target: TARGET,
                kind = %record.kind,
                duration_ms = record.duration_ms,
                errors = %errors,
                "submission failed"
            );
        }
    }

    fn record_security_event(&self, event: &SecurityEvent) {
        let details = event.details.as_deref().unwrap_or("");
        match event.severity {
            ErrorSeverity::Critical => {
                error!(target: TARGET, event = %event.name, severity = "critical", details, "security event");
            }
            ErrorSeverity::High => {
                warn!(target: TARGET, event = %event.name, severity = "high", details, "security event");
            }
            ErrorSeverity::Medium | ErrorSeverity::Low => {
                info!(target: TARGET, event = %event.name, severity = %event.severity, details, "security event");
            }
        }
    }
}
