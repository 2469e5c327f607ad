use std::sync::Arc;

use intake_core::MonitoringFacade;
use intake_domain::{ApiCallRecord, FormSubmissionRecord, SecurityEvent};
use parking_lot::Mutex;

/// Monitoring facade that keeps every event in memory.
#[derive(Clone, Default)]
pub struct RecordingMonitor {
    api_calls: Arc<Mutex<Vec<ApiCallRecord>>>,
    submissions: Arc<Mutex<Vec<FormSubmissionRecord>>>,
    security_events: Arc<Mutex<Vec<SecurityEvent>>>,
}

impl RecordingMonitor {
    pub fn api_calls(&self) -> Vec<ApiCallRecord> {
        self.api_calls.lock().clone()
    }

    pub fn api_calls_to(&self, endpoint: &str) -> Vec<ApiCallRecord> {
        self.api_calls.lock().iter().filter(|r| r.endpoint == endpoint).cloned().collect()
    }

    pub fn submissions(&self) -> Vec<FormSubmissionRecord> {
        self.submissions.lock().clone()
    }

    pub fn security_events(&self) -> Vec<SecurityEvent> {
        self.security_events.lock().clone()
    }
}

impl MonitoringFacade for RecordingMonitor {
    fn record_api_call(&self, record: &ApiCallRecord) {
        self.api_calls.lock().push(record.clone());
    }

    fn record_form_submission(&self, record: &FormSubmissionRecord) {
        self.submissions.lock().push(record.clone());
    }

    fn record_security_event(&self, event: &SecurityEvent) {
        self.security_events.lock().push(event.clone());
    }
}
