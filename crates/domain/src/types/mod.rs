//! Domain types and models

pub mod calendar;
pub mod error_info;
pub mod forms;
pub mod monitoring;
pub mod submission;

pub use calendar::{AttendeeInfo, CalendarEventPayload, EventHandle};
pub use error_info::{ErrorInfo, ErrorKind, ErrorSeverity, OperationContext};
pub use forms::{AppointmentFormData, ContactFormData, RequiredField};
pub use monitoring::{ApiCallRecord, FormSubmissionRecord, SecurityEvent};
pub use submission::{ConnectivityReport, FailureCode, SubmissionKind, SubmissionResult};
