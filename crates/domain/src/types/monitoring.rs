//! Records handed to the monitoring facade

use serde::{Deserialize, Serialize};

use super::{ErrorKind, ErrorSeverity, SubmissionKind};

/// One downstream call attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCallRecord {
    pub endpoint: String,
    pub method: String,
    pub duration_ms: u64,
    /// Transport status, when the failure carried one.
    pub status_code: Option<u16>,
    pub success: bool,
    /// Classified kind for failed attempts.
    pub error: Option<ErrorKind>,
}

impl ApiCallRecord {
    pub fn success(endpoint: &str, method: &str, duration_ms: u64) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            duration_ms,
            status_code: None,
            success: true,
            error: None,
        }
    }

    pub fn failure(
        endpoint: &str,
        method: &str,
        duration_ms: u64,
        status_code: Option<u16>,
        error: ErrorKind,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            duration_ms,
            status_code,
            success: false,
            error: Some(error),
        }
    }
}

/// Terminal outcome of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmissionRecord {
    pub kind: SubmissionKind,
    pub duration_ms: u64,
    pub success: bool,
    /// Failure codes and classified kinds, as wire strings.
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Security-relevant occurrence, such as rejected calendar credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub name: String,
    pub severity: ErrorSeverity,
    pub details: Option<String>,
}
