//! [`MonitoringFacade`](intake_core::MonitoringFacade) adapters

mod fanout;
mod metrics;
mod tracing_monitor;

pub use fanout::FanoutMonitor;
pub use metrics::{MetricsMonitor, MetricsSnapshot, OutcomeCounts, LATENCY_WINDOW};
pub use tracing_monitor::TracingMonitor;
