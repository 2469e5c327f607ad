//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ErrorKind;

/// Type-erased failure crossing a port boundary.
///
/// Collaborators (calendar client, email sender) return this so the
/// classifier can downcast known error types and fall back to message
/// inspection for everything else.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for intake operations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum IntakeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Business rule violated: {0}")]
    BusinessRule(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntakeError {
    /// Taxonomy kind this error classifies as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::Validation,
            Self::BusinessRule(_) => ErrorKind::BusinessLogic,
            Self::Config(_) | Self::Internal(_) => ErrorKind::Unknown,
        }
    }
}

/// Result type alias for intake operations
pub type Result<T> = std::result::Result<T, IntakeError>;

/// Failure reported by a calendar client together with the transport
/// status code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Calendar API error {status_code}: {message}")]
pub struct CalendarApiError {
    pub status_code: u16,
    pub message: String,
}

impl CalendarApiError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self { status_code, message: message.into() }
    }
}
