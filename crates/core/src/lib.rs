//! # Intake Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Business-hours validation for appointment slots
//! - Error classification and taxonomy-driven retries
//! - The submission orchestrator and email composition
//! - Port interfaces (traits) for the calendar client, email sender and
//!   monitoring
//!
//! ## Architecture Principles
//! - Only depends on `intake-common` and `intake-domain`
//! - No HTTP, SMTP, or storage code
//! - All external dependencies via traits
//! - Time is read through an injected clock

pub mod errors;
pub mod submission;
pub mod validation;

// Infrastructure ports
pub mod monitoring_ports;

// Re-export specific items to avoid ambiguity
pub use errors::{ErrorClassifier, ErrorStats, RetryEngine, RetryFailure};
pub use monitoring_ports::{MonitoringFacade, NoopMonitor};
pub use submission::{CalendarClient, EmailSender, SubmissionOrchestrator};
pub use validation::BusinessHoursValidator;
