//! Application constants
//!
//! Centralized location for domain-level constants: monitoring endpoint
//! names, fixed calendar/email subjects, and the catalogue of user-facing
//! messages.

// Monitoring endpoint names
pub const CALENDAR_CREATE_ENDPOINT: &str = "calendar.events.create";
pub const CALENDAR_PROBE_ENDPOINT: &str = "calendar.connection.test";
pub const EMAIL_SEND_ENDPOINT: &str = "email.send";
pub const EMAIL_PROBE_ENDPOINT: &str = "email.probe";
pub const API_METHOD_POST: &str = "POST";
pub const API_METHOD_GET: &str = "GET";

// Operation names used in classification contexts
pub const OP_CREATE_CALENDAR_EVENT: &str = "create_calendar_event";
pub const OP_SEND_FALLBACK_EMAIL: &str = "send_fallback_email";
pub const OP_SEND_MESSAGE_EMAIL: &str = "send_message_email";
pub const OP_VALIDATE_APPOINTMENT: &str = "validate_appointment";
pub const OP_VALIDATE_MESSAGE: &str = "validate_message";

// Subjects
pub const APPOINTMENT_SUBJECT: &str = "Consultation appointment";
pub const FALLBACK_EMAIL_SUBJECT: &str = "Appointment request (calendar unavailable)";
pub const MESSAGE_EMAIL_SUBJECT: &str = "New contact message";

// Security events
pub const SECURITY_EVENT_CALENDAR_AUTH: &str = "calendar_authentication_failure";

// Diagnostic log
pub const DEFAULT_ERROR_LOG_CAPACITY: usize = 100;

/// Pre-approved text shown to submitters. Nothing outside this module is
/// ever surfaced to a caller as a result message.
pub mod messages {
    // Taxonomy fallbacks
    pub const AUTHENTICATION_FAILURE: &str =
        "We could not reach our booking system right now. Please try again later or contact us by email.";
    pub const SERVICE_UNAVAILABLE: &str =
        "Our booking service is temporarily unavailable. Please try again in a few minutes.";
    pub const INVALID_INPUT: &str = "Some of the information provided is invalid. Please check your input.";
    pub const NETWORK_FAILURE: &str =
        "A network problem prevented your request from being sent. Please check your connection and try again.";
    pub const BOOKING_RULE_VIOLATION: &str = "The requested appointment does not meet our booking rules.";
    pub const UNEXPECTED_FAILURE: &str = "An unexpected error occurred. Please try again later.";

    // Outcomes
    pub const CALENDAR_SUCCESS: &str =
        "Your appointment has been booked. You will receive a calendar invitation shortly.";
    pub const FALLBACK_SUCCESS: &str =
        "Your appointment request has been sent. We will confirm your slot by email.";
    pub const MESSAGE_SUCCESS: &str = "Thank you for your message. We will get back to you soon.";
    pub const DELIVERY_FAILED: &str =
        "We could not deliver your request. Please try again later or contact us directly.";
    pub const CANCELLED: &str = "Your request was cancelled before it could be completed.";

    // Booking rules
    pub const DATE_IN_PAST: &str = "Appointments cannot be scheduled in the past.";
    pub const INVALID_TIME: &str = "Please enter the time as HH:MM (24-hour).";

    // Required fields
    pub const MISSING_FIRST_NAME: &str = "Please enter your first name.";
    pub const MISSING_LAST_NAME: &str = "Please enter your last name.";
    pub const MISSING_MESSAGE: &str = "Please enter a message.";
    pub const MISSING_DATE: &str = "Please choose a date for your appointment.";
    pub const MISSING_TIME: &str = "Please choose a time for your appointment.";

    const WEEKDAY_NAMES: [&str; 7] =
        ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

    /// English name of a weekday number (0 = Sunday).
    pub fn weekday_name(day: u8) -> Option<&'static str> {
        WEEKDAY_NAMES.get(usize::from(day)).copied()
    }

    /// Rejection text for a slot outside the working window, e.g.
    /// "Appointments are available Monday, Tuesday, Wednesday, Thursday,
    /// Friday between 14:00 and 16:30 (Europe/Berlin)."
    pub fn outside_business_hours(
        days: impl IntoIterator<Item = u8>,
        start: &str,
        end: &str,
        timezone: &str,
    ) -> String {
        let days: Vec<&str> = days.into_iter().filter_map(weekday_name).collect();
        format!(
            "Appointments are available {} between {start} and {end} ({timezone}).",
            days.join(", ")
        )
    }
}
