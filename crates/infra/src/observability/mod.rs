//! Observability adapters
//!
//! - [`logging`]: global `tracing` subscriber setup
//! - [`monitors`]: [`intake_core::MonitoringFacade`] implementations that
//!   log, aggregate, or fan out submission events
//!
//! Monitor calls never fail and never block on I/O. Locks are
//! `parking_lot` mutexes held only for a counter update or a snapshot.

pub mod logging;
pub mod monitors;

use thiserror::Error;

pub use logging::{init_tracing, LoggingError};
pub use monitors::{FanoutMonitor, MetricsMonitor, MetricsSnapshot, TracingMonitor};

/// Errors from metric reads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    /// No samples recorded yet
    #[error("Empty data: cannot calculate {metric}")]
    EmptyData {
        /// Metric name that failed (e.g., "P95")
        metric: &'static str,
    },
}

/// Result type for metric reads
pub type MetricsResult<T> = Result<T, MetricsError>;
