//! Appointment and message submission

pub mod email;
pub mod ports;
pub mod service;

pub use email::OutgoingEmail;
pub use ports::{CalendarClient, EmailSender};
pub use service::SubmissionOrchestrator;
