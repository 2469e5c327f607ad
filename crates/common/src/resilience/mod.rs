//! Resilience patterns for fault tolerance
//!
//! This module provides **generic, reusable** retry logic: a capped
//! exponential [`Backoff`], a pluggable [`RetryPolicy`], and an async
//! [`RetryExecutor`] that sleeps without blocking and honours an optional
//! cancellation token.
//!
//! Domain-specific decisions (which failures are transient, what the user
//! is told when retries run out) live with the caller. The executor only
//! counts attempts and sleeps.

pub mod retry;

// Re-export retry types
pub use retry::{
    policies, Backoff, RetryDecision, RetryError, RetryExecutor, RetryOutcome, RetryPolicy,
    RetryResult,
};
