//! Email composition for the fallback and message paths
//!
//! Bodies are plain text. The fallback body names the classified failure
//! kind only; raw collaborator error text never leaves the process.

use intake_domain::constants::{FALLBACK_EMAIL_SUBJECT, MESSAGE_EMAIL_SUBJECT};
use intake_domain::{CalendarEventPayload, ContactFormData, ErrorKind};

/// Subject and body ready for an [`EmailSender`](super::ports::EmailSender).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub subject: String,
    pub body: String,
}

/// Appointment request that could not be booked directly.
pub fn appointment_fallback(
    payload: &CalendarEventPayload,
    failure: Option<ErrorKind>,
) -> OutgoingEmail {
    let attendee = &payload.attendee;
    let mut body = String::new();
    push_line(&mut body, "Name", &attendee.name);
    push_line(&mut body, "Company", attendee.company.as_deref().unwrap_or("-"));
    push_line(&mut body, "Requested slot", &describe_slot(payload));
    if let Some(kind) = failure {
        push_line(&mut body, "Calendar booking failed", kind.as_str());
    }
    body.push_str("\nMessage:\n");
    body.push_str(&attendee.message);
    body.push('\n');

    OutgoingEmail { subject: FALLBACK_EMAIL_SUBJECT.to_string(), body }
}

/// Plain contact message.
pub fn contact_message(form: &ContactFormData) -> OutgoingEmail {
    let mut body = String::new();
    push_line(&mut body, "Name", &form.full_name());
    push_line(&mut body, "Company", form.company_name().unwrap_or("-"));
    body.push_str("\nMessage:\n");
    body.push_str(form.message.trim());
    body.push('\n');

    OutgoingEmail {
        subject: format!("{MESSAGE_EMAIL_SUBJECT} from {}", form.full_name()),
        body,
    }
}

/// e.g. "Monday 2024-06-10 14:30-15:00 (Europe/Berlin)"
fn describe_slot(payload: &CalendarEventPayload) -> String {
    format!(
        "{} {}-{} ({})",
        payload.start.format("%A %Y-%m-%d"),
        payload.start.format("%H:%M"),
        payload.end.format("%H:%M"),
        payload.timezone.name()
    )
}

fn push_line(body: &mut String, label: &str, value: &str) {
    body.push_str(label);
    body.push_str(": ");
    body.push_str(value);
    body.push('\n');
}
