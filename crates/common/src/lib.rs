//! Modular common utilities shared across intake crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: collections (ring buffers)
//! - `runtime`: async infrastructure (retry executor, clock)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod collections;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;
#[cfg(feature = "runtime")]
pub mod time;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use collections::{RingBuffer, SharedRingBuffer};
#[cfg(feature = "runtime")]
pub use resilience::{
    Backoff, RetryDecision, RetryError, RetryExecutor, RetryOutcome, RetryPolicy, RetryResult,
};
#[cfg(feature = "runtime")]
pub use time::{Clock, MockClock, SystemClock};
