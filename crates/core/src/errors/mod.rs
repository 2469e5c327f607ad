//! Failure classification and retries

pub mod classifier;
pub mod retry_engine;

pub use classifier::{calendar_status, classify_status, Classification, ErrorClassifier, ErrorStats};
pub use retry_engine::{backoff_for, RetryEngine, RetryFailure};
