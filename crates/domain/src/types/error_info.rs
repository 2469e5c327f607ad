//! Error taxonomy and classified error records
//!
//! Every failure handled by the classifier becomes an [`ErrorInfo`]: a
//! taxonomy [`ErrorKind`], a [`ErrorSeverity`] for alerting, the raw message
//! for operators, and a pre-approved user message that is the only text ever
//! shown to the submitter.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::messages;

/// Fixed failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// 401/403 from the calendar client, credential problems
    Authentication,
    /// 429 or 5xx from the calendar client
    Api,
    /// Malformed input, 400 from the calendar client
    Validation,
    /// Transport and timeout failures
    Network,
    /// Booking-rule violations (past date, outside hours, missing field)
    BusinessLogic,
    /// Anything unclassified
    Unknown,
}

crate::impl_domain_enum_conversions!(ErrorKind {
    Authentication => "authentication",
    Api => "api",
    Validation => "validation",
    Network => "network",
    BusinessLogic => "business_logic",
    Unknown => "unknown",
});

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Authentication,
        Self::Api,
        Self::Validation,
        Self::Network,
        Self::BusinessLogic,
        Self::Unknown,
    ];

    /// Whether failures of this kind are transient by default.
    pub const fn default_retryable(self) -> bool {
        matches!(self, Self::Api | Self::Network)
    }

    /// Default severity. `Api` is refined by status code during
    /// classification (429 medium, 5xx critical).
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Authentication => ErrorSeverity::High,
            Self::Api | Self::Network | Self::Unknown => ErrorSeverity::Medium,
            Self::Validation | Self::BusinessLogic => ErrorSeverity::Low,
        }
    }

    /// Pre-approved text shown to the submitter for this kind.
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Authentication => messages::AUTHENTICATION_FAILURE,
            Self::Api => messages::SERVICE_UNAVAILABLE,
            Self::Validation => messages::INVALID_INPUT,
            Self::Network => messages::NETWORK_FAILURE,
            Self::BusinessLogic => messages::BOOKING_RULE_VIOLATION,
            Self::Unknown => messages::UNEXPECTED_FAILURE,
        }
    }
}

/// Severity used for log verbosity and downstream alerting.
///
/// Severity never decides retryability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

crate::impl_domain_enum_conversions!(ErrorSeverity {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

/// Where and when an error was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationContext {
    pub operation: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl OperationContext {
    pub fn new(operation: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self { operation: operation.into(), timestamp, metadata: BTreeMap::new() }
    }

    /// Attach a metadata entry (fluent).
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A classified failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub id: Uuid,
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    /// Raw detail for operators. Never shown to submitters.
    pub message: String,
    pub user_message: String,
    pub retryable: bool,
    /// 0-based attempt index that produced this error.
    pub retry_count: u32,
    pub max_retries: u32,
    pub context: OperationContext,
}

impl ErrorInfo {
    /// Record using the kind's default severity, retryability and user text.
    pub fn new(kind: ErrorKind, message: impl Into<String>, context: OperationContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            user_message: kind.user_message().to_string(),
            retryable: kind.default_retryable(),
            retry_count: 0,
            max_retries: 0,
            context,
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_retry_state(mut self, retry_count: u32, max_retries: u32) -> Self {
        self.retry_count = retry_count;
        self.max_retries = max_retries;
        self
    }

    /// Critical severity requires immediate operator attention.
    pub fn is_critical(&self) -> bool {
        self.severity == ErrorSeverity::Critical
    }
}
