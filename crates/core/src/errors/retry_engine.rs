//! Taxonomy-driven retries
//!
//! Wraps the generic [`RetryExecutor`] so that every failed attempt is
//! classified, logged, and retried only when its kind is both transient and
//! listed in the active [`RetryConfig`]. Callers only ever see the
//! pre-approved user message of the final classification.

use std::future::Future;
use std::sync::Arc;

use intake_common::resilience::{Backoff, RetryDecision, RetryError, RetryExecutor, RetryPolicy};
use intake_domain::constants::messages;
use intake_domain::{BoxedError, ErrorInfo, ErrorKind, OperationContext, RetryConfig};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::classifier::ErrorClassifier;

/// Terminal failure of [`RetryEngine::with_retry`].
///
/// `Display` yields the user-facing message only.
#[derive(Debug, Error)]
pub enum RetryFailure {
    /// Retries exhausted or the error was not retryable.
    #[error("{}", .info.user_message)]
    GaveUp { info: ErrorInfo, attempts: u32 },

    /// The cancellation token fired between attempts.
    #[error("{}", messages::CANCELLED)]
    Cancelled { info: Option<ErrorInfo>, attempts: u32 },
}

impl RetryFailure {
    /// Text safe to show to the submitter.
    pub fn user_message(&self) -> &str {
        match self {
            Self::GaveUp { info, .. } => &info.user_message,
            Self::Cancelled { .. } => messages::CANCELLED,
        }
    }

    /// Last classified error, if any attempt ran.
    pub fn info(&self) -> Option<&ErrorInfo> {
        match self {
            Self::GaveUp { info, .. } => Some(info),
            Self::Cancelled { info, .. } => info.as_ref(),
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.info().map(|info| info.kind)
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::GaveUp { attempts, .. } | Self::Cancelled { attempts, .. } => *attempts,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Backoff schedule described by `config`.
pub fn backoff_for(config: &RetryConfig) -> Backoff {
    Backoff::exponential(config.base_delay, config.backoff_multiplier, config.max_delay)
}

/// Retries only classified errors that are transient and allowed.
struct TaxonomyPolicy<'a> {
    config: &'a RetryConfig,
}

impl RetryPolicy<ErrorInfo> for TaxonomyPolicy<'_> {
    fn should_retry(&self, info: &ErrorInfo, _attempt: u32) -> RetryDecision {
        if info.retryable && self.config.allows(info.kind) {
            RetryDecision::Retry
        } else {
            RetryDecision::Stop
        }
    }
}

/// Runs fallible operations under a [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct RetryEngine {
    classifier: Arc<ErrorClassifier>,
    default_config: RetryConfig,
}

impl RetryEngine {
    pub fn new(classifier: Arc<ErrorClassifier>, default_config: RetryConfig) -> Self {
        Self { classifier, default_config }
    }

    pub fn classifier(&self) -> &Arc<ErrorClassifier> {
        &self.classifier
    }

    pub fn default_config(&self) -> &RetryConfig {
        &self.default_config
    }

    /// Run `operation` until it succeeds, fails with an error that may not
    /// be retried, or exhausts `max_retries`. `config` overrides the
    /// engine default for this call.
    ///
    /// `operation` receives the 0-based attempt index. Runs to completion;
    /// see [`RetryEngine::with_retry_cancellable`] to stop early.
    pub async fn with_retry<F, Fut, T>(
        &self,
        operation: F,
        context: OperationContext,
        config: Option<&RetryConfig>,
    ) -> Result<T, RetryFailure>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, BoxedError>>,
    {
        self.run(operation, context, config, None).await
    }

    /// Like [`RetryEngine::with_retry`], but stops before the next attempt
    /// once `cancellation` fires.
    pub async fn with_retry_cancellable<F, Fut, T>(
        &self,
        operation: F,
        context: OperationContext,
        config: Option<&RetryConfig>,
        cancellation: &CancellationToken,
    ) -> Result<T, RetryFailure>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, BoxedError>>,
    {
        self.run(operation, context, config, Some(cancellation.clone())).await
    }

    #[instrument(skip_all, fields(operation = %context.operation))]
    async fn run<F, Fut, T>(
        &self,
        mut operation: F,
        context: OperationContext,
        config: Option<&RetryConfig>,
        cancellation: Option<CancellationToken>,
    ) -> Result<T, RetryFailure>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, BoxedError>>,
    {
        let config = config.unwrap_or(&self.default_config);
        let max_retries = config.max_retries;
        let mut executor =
            RetryExecutor::new(max_retries, backoff_for(config), TaxonomyPolicy { config });
        if let Some(token) = cancellation {
            executor = executor.with_cancellation(token);
        }

        let classifier = &self.classifier;
        let context = &context;
        let result = executor
            .execute(|attempt| {
                let attempt_future = operation(attempt);
                async move {
                    attempt_future.await.map_err(|err| {
                        let info = classifier
                            .analyze(&*err, context.clone())
                            .with_retry_state(attempt, max_retries);
                        classifier.record(info)
                    })
                }
            })
            .await;

        match result {
            Ok(value) => Ok(value),
            Err(RetryError::Exhausted { attempts, last_error }) => {
                warn!(kind = %last_error.kind, attempts, "Retries exhausted");
                Err(RetryFailure::GaveUp { info: last_error, attempts })
            }
            Err(RetryError::NonRetryable { attempts, last_error }) => {
                debug!(kind = %last_error.kind, attempts, "Error not retryable");
                Err(RetryFailure::GaveUp { info: last_error, attempts })
            }
            Err(RetryError::Cancelled { attempts, last_error }) => {
                debug!(attempts, "Retry cancelled");
                Err(RetryFailure::Cancelled { info: last_error, attempts })
            }
        }
    }
}
