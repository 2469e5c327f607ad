//! Port interfaces for submission delivery
//!
//! Both collaborators report failures as [`BoxedError`] so the classifier
//! can recognise typed errors such as
//! [`CalendarApiError`](intake_domain::CalendarApiError).

use async_trait::async_trait;
use intake_domain::{BoxedError, CalendarEventPayload, EventHandle};

/// Creates events in the remote scheduling service.
#[async_trait]
pub trait CalendarClient: Send + Sync {
    /// Create an event. Failures carrying a transport status should be
    /// returned as `CalendarApiError`.
    async fn create_event(&self, payload: &CalendarEventPayload) -> Result<EventHandle, BoxedError>;

    /// Check that the service is reachable and the credentials work.
    async fn test_connection(&self) -> Result<bool, BoxedError>;
}

/// Delivers plain-text email to the site operator.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, subject: &str, body: &str) -> Result<(), BoxedError>;

    /// Check that the transport is usable without sending anything.
    async fn probe(&self) -> Result<bool, BoxedError>;
}
