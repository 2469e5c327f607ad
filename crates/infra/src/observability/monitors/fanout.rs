//! Forward every monitoring event to several facades

use std::fmt;
use std::sync::Arc;

use intake_core::MonitoringFacade;
use intake_domain::{ApiCallRecord, FormSubmissionRecord, SecurityEvent};

/// Calls each registered facade in registration order.
#[derive(Clone, Default)]
pub struct FanoutMonitor {
    targets: Vec<Arc<dyn MonitoringFacade>>,
}

impl FanoutMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with(mut self, target: Arc<dyn MonitoringFacade>) -> Self {
        self.targets.push(target);
        self
    }

    pub fn push(&mut self, target: Arc<dyn MonitoringFacade>) {
        self.targets.push(target);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl fmt::Debug for FanoutMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanoutMonitor").field("targets", &self.targets.len()).finish()
    }
}

impl MonitoringFacade for FanoutMonitor {
    fn record_api_call(&self, record: &ApiCallRecord) {
        for target in &self.targets {
            target.record_api_call(record);
        }
    }

    fn record_form_submission(&self, record: &FormSubmissionRecord) {
        for target in &self.targets {
            target.record_form_submission(record);
        }
    }

    fn record_security_event(&self, event: &SecurityEvent) {
        for target in &self.targets {
            target.record_security_event(event);
        }
    }
}
