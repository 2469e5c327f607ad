//! Submitted form payloads
//!
//! Field values arrive exactly as the visitor typed them. A required field
//! counts as missing when it is empty after trimming.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::FailureCode;
use crate::constants::messages;

/// Required inputs, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    FirstName,
    LastName,
    Message,
    Date,
    Time,
}

impl RequiredField {
    /// Failure code reported when this field is missing.
    pub const fn failure_code(self) -> FailureCode {
        match self {
            Self::FirstName => FailureCode::MissingFirstName,
            Self::LastName => FailureCode::MissingLastName,
            Self::Message => FailureCode::MissingMessage,
            Self::Date => FailureCode::MissingDate,
            Self::Time => FailureCode::MissingTime,
        }
    }

    /// Field-specific prompt shown to the visitor.
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::FirstName => messages::MISSING_FIRST_NAME,
            Self::LastName => messages::MISSING_LAST_NAME,
            Self::Message => messages::MISSING_MESSAGE,
            Self::Date => messages::MISSING_DATE,
            Self::Time => messages::MISSING_TIME,
        }
    }

    /// Form field name as the UI layer knows it.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Message => "message",
            Self::Date => "date",
            Self::Time => "time",
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Plain contact request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormData {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ContactFormData {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            company: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// First required field that is empty after trimming.
    pub fn missing_field(&self) -> Option<RequiredField> {
        if is_blank(&self.first_name) {
            Some(RequiredField::FirstName)
        } else if is_blank(&self.last_name) {
            Some(RequiredField::LastName)
        } else if is_blank(&self.message) {
            Some(RequiredField::Message)
        } else {
            None
        }
    }

    /// `true` when every required field is present.
    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    /// "First Last", trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Company, if given and non-blank.
    pub fn company_name(&self) -> Option<&str> {
        self.company.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Contact request that also asks for a specific slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentFormData {
    #[serde(flatten)]
    pub contact: ContactFormData,
    /// Requested day in the business timezone.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Requested start as 24-hour `HH:MM`.
    #[serde(default)]
    pub time: String,
}

impl AppointmentFormData {
    pub fn new(contact: ContactFormData, date: NaiveDate, time: impl Into<String>) -> Self {
        Self { contact, date: Some(date), time: time.into() }
    }

    /// First required field that is missing, contact fields first.
    pub fn missing_field(&self) -> Option<RequiredField> {
        self.contact.missing_field().or_else(|| {
            if self.date.is_none() {
                Some(RequiredField::Date)
            } else if is_blank(&self.time) {
                Some(RequiredField::Time)
            } else {
                None
            }
        })
    }

    /// Time string with surrounding whitespace removed.
    pub fn time_str(&self) -> &str {
        self.time.trim()
    }
}
