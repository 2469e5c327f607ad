//! Submission outcomes
//!
//! A [`SubmissionResult`] is built once per call and handed to the caller.
//! Callers branch on [`SubmissionResult::kind`] and
//! [`SubmissionResult::success`]; the message is display text only.

use serde::{Deserialize, Serialize};

use crate::constants::messages;

/// Which path produced the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Appointment,
    EmailFallback,
    Message,
}

crate::impl_domain_enum_conversions!(SubmissionKind {
    Appointment => "appointment",
    EmailFallback => "email_fallback",
    Message => "message",
});

/// Machine-readable reason attached to a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    MissingFirstName,
    MissingLastName,
    MissingMessage,
    MissingDate,
    MissingTime,
    InvalidTime,
    DateInPast,
    OutsideBusinessHours,
    DeliveryFailed,
    Cancelled,
}

crate::impl_domain_enum_conversions!(FailureCode {
    MissingFirstName => "MISSING_FIRST_NAME",
    MissingLastName => "MISSING_LAST_NAME",
    MissingMessage => "MISSING_MESSAGE",
    MissingDate => "MISSING_DATE",
    MissingTime => "MISSING_TIME",
    InvalidTime => "INVALID_TIME",
    DateInPast => "DATE_IN_PAST",
    OutsideBusinessHours => "OUTSIDE_BUSINESS_HOURS",
    DeliveryFailed => "DELIVERY_FAILED",
    Cancelled => "CANCELLED",
});

impl FailureCode {
    /// Every code, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::MissingFirstName,
        Self::MissingLastName,
        Self::MissingMessage,
        Self::MissingDate,
        Self::MissingTime,
        Self::InvalidTime,
        Self::DateInPast,
        Self::OutsideBusinessHours,
        Self::DeliveryFailed,
        Self::Cancelled,
    ];

    /// Whether the code stems from input validation rather than delivery.
    pub const fn is_rejection(self) -> bool {
        !matches!(self, Self::DeliveryFailed | Self::Cancelled)
    }
}

/// Final outcome of one submission call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    kind: SubmissionKind,
    success: bool,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<FailureCode>,
}

impl SubmissionResult {
    /// Calendar event created.
    pub fn appointment_booked(event_id: impl Into<String>) -> Self {
        Self {
            kind: SubmissionKind::Appointment,
            success: true,
            message: messages::CALENDAR_SUCCESS.to_string(),
            event_id: Some(event_id.into()),
            error: None,
        }
    }

    /// Calendar path failed, request delivered by email instead.
    pub fn fallback_delivered() -> Self {
        Self {
            kind: SubmissionKind::EmailFallback,
            success: true,
            message: messages::FALLBACK_SUCCESS.to_string(),
            event_id: None,
            error: None,
        }
    }

    /// Contact message delivered.
    pub fn message_sent() -> Self {
        Self {
            kind: SubmissionKind::Message,
            success: true,
            message: messages::MESSAGE_SUCCESS.to_string(),
            event_id: None,
            error: None,
        }
    }

    /// Failed submission with a user-facing message.
    pub fn failed(kind: SubmissionKind, code: FailureCode, message: impl Into<String>) -> Self {
        Self { kind, success: false, message: message.into(), event_id: None, error: Some(code) }
    }

    pub fn kind(&self) -> SubmissionKind {
        self.kind
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Display text. Not for programmatic branching.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref()
    }

    pub fn error(&self) -> Option<FailureCode> {
        self.error
    }
}

/// Result of probing both downstream paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityReport {
    pub calendar: bool,
    pub email: bool,
}

impl ConnectivityReport {
    pub fn all_healthy(&self) -> bool {
        self.calendar && self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booked_result_shape() {
        let result = SubmissionResult::appointment_booked("evt-1");
        assert!(result.success());
        assert_eq!(result.kind(), SubmissionKind::Appointment);
        assert_eq!(result.event_id(), Some("evt-1"));
        assert_eq!(result.error(), None);
    }

    #[test]
    fn test_failed_result_serializes_wire_names() {
        let result = SubmissionResult::failed(
            SubmissionKind::Appointment,
            FailureCode::DateInPast,
            messages::DATE_IN_PAST,
        );
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["kind"], "appointment");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "DATE_IN_PAST");
        assert!(json.get("event_id").is_none());
    }

    #[test]
    fn test_fallback_kind_wire_name() {
        let json = serde_json::to_value(SubmissionResult::fallback_delivered()).expect("serialize");
        assert_eq!(json["kind"], "email_fallback");
        assert_eq!(SubmissionKind::EmailFallback.to_string(), "email_fallback");
    }

    #[test]
    fn test_rejection_codes() {
        assert_eq!(FailureCode::OutsideBusinessHours.to_string(), "OUTSIDE_BUSINESS_HOURS");
        assert!(FailureCode::OutsideBusinessHours.is_rejection());
        assert!(!FailureCode::DeliveryFailed.is_rejection());
        assert!(!FailureCode::Cancelled.is_rejection());
    }

    #[test]
    fn test_failure_code_display_matches_serde_and_parses_back() {
        for code in FailureCode::ALL {
            let json = serde_json::to_value(code).expect("serialize");
            assert_eq!(json, code.to_string(), "{code:?}");
            assert_eq!(code.as_str().parse::<FailureCode>(), Ok(code));
            assert_eq!(code.as_str().to_lowercase().parse::<FailureCode>(), Ok(code));
        }
        assert!("UNKNOWN_CODE".parse::<FailureCode>().is_err());
    }

    #[test]
    fn test_connectivity_report() {
        let report = ConnectivityReport { calendar: false, email: true };
        assert!(!report.all_healthy());
        assert_eq!(
            serde_json::to_string(&report).expect("serialize"),
            r#"{"calendar":false,"email":true}"#
        );
    }
}
