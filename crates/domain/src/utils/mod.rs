//! Utility functions for domain types

pub mod serde;

pub use self::serde::{format_hhmm, parse_hhmm};
