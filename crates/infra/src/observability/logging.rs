//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over [`LoggingConfig::level`]. Output is
//! human-readable by default, JSON lines when `json` is set.

use intake_domain::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Errors from [`init_tracing`].
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter {directive:?}: {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("global tracing subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Build the filter: `RUST_LOG` if set and valid, else `config.level`.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| LoggingError::InvalidFilter {
        directive: config.level.clone(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber.
///
/// # Errors
/// `InvalidFilter` for an unparsable level, `AlreadyInitialized` when a
/// global subscriber is already set (for example on a second call).
pub fn init_tracing(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_current_span(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::debug!(level = %config.level, json = config.json, "Tracing initialized");
    Ok(())
}
