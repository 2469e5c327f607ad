//! Failure classification
//!
//! Maps arbitrary collaborator errors into the fixed [`ErrorKind`] taxonomy
//! and keeps a bounded diagnostic log of every classified failure.
//!
//! Classification tiers, first match wins:
//! 1. Typed errors anywhere in the source chain: [`CalendarApiError`] by
//!    status code, [`IntakeError`] by its own kind
//! 2. Case-insensitive keyword matching on the error message
//! 3. [`ErrorKind::Unknown`]
//!
//! Keyword matching depends on collaborator wording and is the least
//! reliable tier. Prefer returning a typed error from adapters.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::sync::Arc;

use intake_common::collections::SharedRingBuffer;
use intake_common::time::{Clock, SystemClock};
use intake_domain::constants::DEFAULT_ERROR_LOG_CAPACITY;
use intake_domain::{
    CalendarApiError, ErrorInfo, ErrorKind, ErrorSeverity, IntakeError, OperationContext,
};
use serde::Serialize;
use tracing::{debug, error, warn};

const NETWORK_KEYWORDS: &[&str] =
    &["network", "timeout", "timed out", "connection", "fetch", "dns", "unreachable"];
const AUTH_KEYWORDS: &[&str] = &["auth", "unauthorized", "forbidden", "token", "credential"];
const VALIDATION_KEYWORDS: &[&str] = &["validation", "invalid", "malformed", "required"];

/// Kind and severity decided for one error, before it is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    /// Transport status code when a typed calendar error was found.
    pub status_code: Option<u16>,
}

impl Classification {
    fn of_kind(kind: ErrorKind) -> Self {
        Self { kind, severity: kind.default_severity(), status_code: None }
    }
}

/// Counts over the current diagnostic log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorStats {
    pub total: usize,
    /// Entries dropped to make room since creation.
    pub evicted: u64,
    pub by_kind: BTreeMap<ErrorKind, usize>,
    pub by_severity: BTreeMap<ErrorSeverity, usize>,
}

/// Classifies failures and owns the diagnostic log.
///
/// Construct one per process and share it behind an `Arc`.
pub struct ErrorClassifier {
    log: SharedRingBuffer<ErrorInfo>,
    clock: Arc<dyn Clock>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_LOG_CAPACITY)
    }
}

impl ErrorClassifier {
    /// Classifier keeping the newest `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self { log: SharedRingBuffer::new(capacity), clock }
    }

    /// Fresh context for `operation`, stamped with the current time.
    pub fn context(&self, operation: &str) -> OperationContext {
        OperationContext::new(operation, self.clock.now())
    }

    /// Decide kind and severity without touching the log.
    pub fn categorize(&self, error: &(dyn StdError + 'static)) -> Classification {
        if let Some(typed) = Self::typed_classification(error) {
            return typed;
        }

        let message = error.to_string().to_lowercase();
        let kind = if contains_any(&message, NETWORK_KEYWORDS) {
            ErrorKind::Network
        } else if contains_any(&message, AUTH_KEYWORDS) {
            ErrorKind::Authentication
        } else if contains_any(&message, VALIDATION_KEYWORDS) {
            ErrorKind::Validation
        } else {
            ErrorKind::Unknown
        };
        Classification::of_kind(kind)
    }

    /// Build the [`ErrorInfo`] for `error` without touching the log.
    pub fn analyze(&self, error: &(dyn StdError + 'static), context: OperationContext) -> ErrorInfo {
        let classification = self.categorize(error);
        let context = match classification.status_code {
            Some(code) => context.with_metadata("status_code", code.to_string()),
            None => context,
        };
        ErrorInfo::new(classification.kind, error.to_string(), context)
            .with_severity(classification.severity)
    }

    /// Classify `error` and append the result to the log. Never fails.
    pub fn classify(&self, error: &(dyn StdError + 'static), context: OperationContext) -> ErrorInfo {
        self.record(self.analyze(error, context))
    }

    /// Record a failure the caller has already categorized, such as a
    /// booking-rule violation.
    pub fn classify_kind(
        &self,
        kind: ErrorKind,
        message: impl Into<String>,
        context: OperationContext,
    ) -> ErrorInfo {
        self.record(ErrorInfo::new(kind, message, context))
    }

    /// Append `info` to the log and emit a diagnostic event.
    pub fn record(&self, info: ErrorInfo) -> ErrorInfo {
        match info.severity {
            ErrorSeverity::Critical | ErrorSeverity::High => error!(
                error_id = %info.id,
                kind = %info.kind,
                severity = %info.severity,
                operation = %info.context.operation,
                retry_count = info.retry_count,
                "Classified error"
            ),
            ErrorSeverity::Medium => warn!(
                error_id = %info.id,
                kind = %info.kind,
                operation = %info.context.operation,
                retry_count = info.retry_count,
                "Classified error"
            ),
            ErrorSeverity::Low => debug!(
                error_id = %info.id,
                kind = %info.kind,
                operation = %info.context.operation,
                "Classified error"
            ),
        }
        self.log.push(info.clone());
        info
    }

    /// Up to `n` newest entries, oldest first.
    pub fn recent_errors(&self, n: usize) -> Vec<ErrorInfo> {
        self.log.recent(n)
    }

    /// Every entry currently held, oldest first.
    pub fn error_log(&self) -> Vec<ErrorInfo> {
        self.log.snapshot()
    }

    pub fn error_stats(&self) -> ErrorStats {
        let entries = self.log.snapshot();
        let mut stats = ErrorStats { total: entries.len(), evicted: self.log.evicted(), ..ErrorStats::default() };
        for info in &entries {
            *stats.by_kind.entry(info.kind).or_default() += 1;
            *stats.by_severity.entry(info.severity).or_default() += 1;
        }
        stats
    }

    pub fn clear_error_log(&self) {
        self.log.clear();
    }

    fn typed_classification(error: &(dyn StdError + 'static)) -> Option<Classification> {
        std::iter::successors(Some(error), |&e| e.source()).find_map(|e| {
            if let Some(api) = e.downcast_ref::<CalendarApiError>() {
                return Some(classify_status(api.status_code));
            }
            e.downcast_ref::<IntakeError>().map(|own| Classification::of_kind(own.kind()))
        })
    }
}

impl std::fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorClassifier").field("log", &self.log).finish_non_exhaustive()
    }
}

/// Map a calendar transport status to kind and severity.
pub fn classify_status(status_code: u16) -> Classification {
    let (kind, severity) = match status_code {
        401 | 403 => (ErrorKind::Authentication, ErrorSeverity::High),
        429 => (ErrorKind::Api, ErrorSeverity::Medium),
        500.. => (ErrorKind::Api, ErrorSeverity::Critical),
        400..=499 => (ErrorKind::Validation, ErrorSeverity::Low),
        _ => (ErrorKind::Unknown, ErrorKind::Unknown.default_severity()),
    };
    Classification { kind, severity, status_code: Some(status_code) }
}

/// Status code of a typed calendar error anywhere in the source chain.
pub fn calendar_status(error: &(dyn StdError + 'static)) -> Option<u16> {
    std::iter::successors(Some(error), |&e| e.source())
        .find_map(|e| e.downcast_ref::<CalendarApiError>().map(|api| api.status_code))
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
