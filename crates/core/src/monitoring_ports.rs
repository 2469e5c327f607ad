//! Monitoring port - receives timing and outcome events from the
//! submission pipeline
//!
//! The orchestrator reports through this trait and never depends on how
//! events are stored or transmitted. Calls are synchronous and must not
//! block; implementations that ship events elsewhere should buffer.

use intake_domain::{ApiCallRecord, FormSubmissionRecord, SecurityEvent};

/// Port trait for submission monitoring
pub trait MonitoringFacade: Send + Sync {
    /// One downstream call attempt finished.
    fn record_api_call(&self, record: &ApiCallRecord);

    /// One submission reached a terminal state.
    fn record_form_submission(&self, record: &FormSubmissionRecord);

    /// Something security-relevant happened.
    fn record_security_event(&self, event: &SecurityEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl MonitoringFacade for NoopMonitor {
    fn record_api_call(&self, _record: &ApiCallRecord) {}

    fn record_form_submission(&self, _record: &FormSubmissionRecord) {}

    fn record_security_event(&self, _event: &SecurityEvent) {}
}
