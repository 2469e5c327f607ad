//! Serialization helpers for configuration values
//!
//! Durations travel as integer milliseconds and times of day as 24-hour
//! `"HH:MM"` strings.

use std::time::Duration;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

/// Serde serialization result type
type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

/// Parse a strict 24-hour `"HH:MM"` string.
///
/// Exactly two hour digits and two minute digits are required; `"9:00"`
/// and `"24:00"` are rejected.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    if !bytes.iter().enumerate().all(|(i, b)| i == 2 || b.is_ascii_digit()) {
        return None;
    }
    let hour = u32::from(bytes[0] - b'0') * 10 + u32::from(bytes[1] - b'0');
    let minute = u32::from(bytes[3] - b'0') * 10 + u32::from(bytes[4] - b'0');
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Format a time of day as `"HH:MM"`, dropping seconds.
pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// `NaiveTime` as `"HH:MM"`.
///
/// ```rust
/// use chrono::NaiveTime;
/// use intake_domain::utils::serde::hhmm;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Window {
///     #[serde(with = "hhmm")]
///     start: NaiveTime,
/// }
/// ```
pub mod hhmm {
    use super::*;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_hhmm(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_hhmm(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid time of day '{raw}', expected HH:MM"))
        })
    }
}

/// `Duration` as milliseconds (u64).
pub mod duration_millis {
    use super::*;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
