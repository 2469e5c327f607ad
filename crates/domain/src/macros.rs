//! Macro for implementing Display and FromStr for wire-named enums
//!
//! Taxonomy and outcome enums travel to monitoring and the UI layer as
//! stable wire strings. This macro keeps `Display` and `FromStr` in one
//! mapping so the two directions cannot drift.
//!
//! # Example
//!
//! ```rust
//! use intake_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Calendar,
//!     Email,
//! }
//!
//! impl_domain_enum_conversions!(Channel {
//!     Calendar => "calendar",
//!     Email => "email",
//! });
//!
//! assert_eq!(Channel::Email.to_string(), "email");
//! assert_eq!("CALENDAR".parse::<Channel>(), Ok(Channel::Calendar));
//! ```

/// Implements Display and FromStr for a fieldless enum
///
/// - Display writes the mapped string
/// - FromStr parses case-insensitively (ASCII)
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Stable wire name of this variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
