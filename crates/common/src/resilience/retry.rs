//! Generic async retry executor with exponential backoff
//!
//! The executor runs an operation up to `1 + max_retries` times. After each
//! failure a [`RetryPolicy`] decides whether the error is worth another
//! attempt; if so the executor sleeps for the backoff delay without blocking
//! the runtime and tries again.
//!
//! A [`CancellationToken`] may be attached. Without one the executor always
//! runs to completion, so there is no overall deadline: with the default
//! production backoff the sleeps alone add up to
//! [`Backoff::worst_case_total`].

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Terminal failure of a retried operation
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every permitted attempt failed with a retryable error
    #[error("All retry attempts exhausted after {attempts} tries")]
    Exhausted { attempts: u32, last_error: E },

    /// The policy refused to retry the error
    #[error("Operation failed with non-retryable error after {attempts} tries")]
    NonRetryable { attempts: u32, last_error: E },

    /// The cancellation token fired before the next attempt
    #[error("Retry cancelled after {attempts} tries")]
    Cancelled { attempts: u32, last_error: Option<E> },
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. }
            | Self::NonRetryable { attempts, .. }
            | Self::Cancelled { attempts, .. } => *attempts,
        }
    }

    /// Borrow the last error the operation produced, if any.
    pub fn last_error(&self) -> Option<&E> {
        match self {
            Self::Exhausted { last_error, .. } | Self::NonRetryable { last_error, .. } => {
                Some(last_error)
            }
            Self::Cancelled { last_error, .. } => last_error.as_ref(),
        }
    }

    /// Take the last error the operation produced, if any.
    pub fn into_last_error(self) -> Option<E> {
        match self {
            Self::Exhausted { last_error, .. } | Self::NonRetryable { last_error, .. } => {
                Some(last_error)
            }
            Self::Cancelled { last_error, .. } => last_error,
        }
    }

    /// `true` when the run stopped because of cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Result of a retried run together with what it cost.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: RetryResult<T, E>,
    /// Attempts made, including the first one.
    pub attempts: u32,
    /// Every delay slept, in order.
    pub delays: Vec<Duration>,
}

impl<T, E> RetryOutcome<T, E> {
    /// Consume the outcome and return only the result.
    pub fn into_result(self) -> RetryResult<T, E> {
        self.result
    }

    /// Sum of all delays slept between attempts.
    pub fn total_delay(&self) -> Duration {
        self.delays.iter().sum()
    }
}

/// Decides whether a failed attempt should be retried
pub trait RetryPolicy<E> {
    /// `attempt` is the 0-based index of the attempt that just failed.
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;
}

/// Decision for whether to retry an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the backoff delay
    Retry,
    /// Retry after a caller-supplied delay
    RetryAfter(Duration),
    /// Give up
    Stop,
}

/// Capped exponential backoff.
///
/// The delay after failed attempt `n` (0-based) is
/// `min(base_delay * multiplier^n, max_delay)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Backoff {
    /// Build an exponential backoff.
    pub fn exponential(base_delay: Duration, multiplier: f64, max_delay: Duration) -> Self {
        Self { base_delay, multiplier, max_delay }
    }

    /// Delay to sleep after failed attempt `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let raw = self.base_delay.as_millis() as f64 * self.multiplier.powi(exponent);
        let cap = self.max_delay.as_millis() as f64;
        let millis = if raw.is_nan() { cap } else { raw.min(cap) };
        Duration::from_millis(millis.max(0.0) as u64)
    }

    /// Total time spent sleeping if every one of `max_retries` retries runs.
    pub fn worst_case_total(&self, max_retries: u32) -> Duration {
        (0..max_retries).map(|attempt| self.delay_for(attempt)).sum()
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::exponential(Duration::from_millis(1000), 2.0, Duration::from_millis(10_000))
    }
}

/// Runs an operation with retries according to a policy
pub struct RetryExecutor<P> {
    max_retries: u32,
    backoff: Backoff,
    policy: P,
    cancellation: Option<CancellationToken>,
}

impl<P> RetryExecutor<P> {
    /// Executor allowing `max_retries` retries after the first attempt.
    pub fn new(max_retries: u32, backoff: Backoff, policy: P) -> Self {
        Self { max_retries, backoff, policy, cancellation: None }
    }

    /// Stop between attempts once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Maximum number of retries after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Configured backoff.
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Run `operation`, returning only the result.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> RetryResult<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Debug,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_with_outcome(operation).await.into_result()
    }

    /// Run `operation`, returning the result plus attempt statistics.
    ///
    /// `operation` receives the 0-based attempt index.
    #[instrument(skip_all, fields(max_retries = self.max_retries))]
    pub async fn execute_with_outcome<F, Fut, T, E>(&self, mut operation: F) -> RetryOutcome<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Debug,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut delays = Vec::new();
        let mut attempt: u32 = 0;

        loop {
            if self.is_cancelled() {
                debug!(attempt, "Retry cancelled before attempt");
                return RetryOutcome {
                    result: Err(RetryError::Cancelled { attempts: attempt, last_error: None }),
                    attempts: attempt,
                    delays,
                };
            }

            debug!("Executing operation (attempt {}/{})", attempt + 1, self.max_retries + 1);
            let error = match operation(attempt).await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!("Operation succeeded after {} retries", attempt);
                    }
                    return RetryOutcome { result: Ok(value), attempts: attempt + 1, delays };
                }
                Err(error) => error,
            };
            let attempts = attempt + 1;

            let delay = match self.policy.should_retry(&error, attempt) {
                RetryDecision::Stop => {
                    debug!(?error, "Retry policy determined not to retry");
                    return RetryOutcome {
                        result: Err(RetryError::NonRetryable { attempts, last_error: error }),
                        attempts,
                        delays,
                    };
                }
                RetryDecision::Retry => self.backoff.delay_for(attempt),
                RetryDecision::RetryAfter(delay) => delay,
            };

            if attempt >= self.max_retries {
                warn!(?error, "All retry attempts exhausted after {} tries", attempts);
                return RetryOutcome {
                    result: Err(RetryError::Exhausted { attempts, last_error: error }),
                    attempts,
                    delays,
                };
            }

            warn!("Operation failed (attempt {}), retrying after {:?}", attempts, delay);
            if !self.sleep(delay).await {
                return RetryOutcome {
                    result: Err(RetryError::Cancelled { attempts, last_error: Some(error) }),
                    attempts,
                    delays,
                };
            }
            delays.push(delay);
            attempt += 1;
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Returns `false` if cancelled while sleeping.
    async fn sleep(&self, delay: Duration) -> bool {
        match &self.cancellation {
            Some(token) => tokio::select! {
                () = token.cancelled() => false,
                () = tokio::time::sleep(delay) => true,
            },
            None => {
                tokio::time::sleep(delay).await;
                true
            }
        }
    }
}

/// Pre-defined retry policies for common scenarios
pub mod policies {
    use super::{RetryDecision, RetryPolicy};

    /// Retries on any error
    #[derive(Debug, Clone)]
    pub struct AlwaysRetry;

    impl<E> RetryPolicy<E> for AlwaysRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Retry
        }
    }

    /// Never retries
    #[derive(Debug, Clone)]
    pub struct NeverRetry;

    impl<E> RetryPolicy<E> for NeverRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Stop
        }
    }

    /// Retries while the predicate holds
    #[derive(Debug)]
    pub struct PredicateRetry<F> {
        predicate: F,
    }

    impl<F> PredicateRetry<F> {
        pub fn new(predicate: F) -> Self {
            Self { predicate }
        }
    }

    impl<F, E> RetryPolicy<E> for PredicateRetry<F>
    where
        F: Fn(&E, u32) -> bool,
    {
        fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision {
            if (self.predicate)(error, attempt) {
                RetryDecision::Retry
            } else {
                RetryDecision::Stop
            }
        }
    }
}
