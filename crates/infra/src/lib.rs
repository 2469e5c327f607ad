//! # Intake Infrastructure
//!
//! Impure adapters around the submission core.
//!
//! This crate contains:
//! - Configuration loading from `.env`, JSON/TOML files and `INTAKE_*`
//!   environment variables
//! - Global `tracing` subscriber setup
//! - Monitoring facades: structured logging, in-memory metrics, fan-out
//!
//! ## Architecture
//! - Implements [`intake_core::MonitoringFacade`]
//! - Depends on `intake-common`, `intake-domain` and `intake-core`
//! - Calendar and email transports are supplied by the embedding
//!   application through the core port traits

pub mod config;
pub mod observability;

// Re-export commonly used items
pub use observability::{
    init_tracing, FanoutMonitor, LoggingError, MetricsMonitor, MetricsSnapshot, TracingMonitor,
};
