//! # Intake Domain
//!
//! Business domain types for the appointment and contact intake pipeline.
//!
//! This crate contains:
//! - Form payloads and submission outcomes
//! - The error taxonomy and classified error records
//! - Business-hours, retry and application configuration
//! - The catalogue of user-facing messages
//!
//! ## Architecture
//! - No dependencies on other intake crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod macros;

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
