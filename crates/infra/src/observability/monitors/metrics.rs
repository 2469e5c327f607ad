//! In-memory aggregate monitor
//!
//! Counts api calls, submissions and security events, and keeps the last
//! [`LATENCY_WINDOW`] api-call durations for P50/P95/P99.
//!
//! ## Design
//! - Fixed-capacity latency window, oldest sample evicted first
//! - SeqCst for totals that feed derived rates, map updates under one lock
//! - Percentile reads clone the window and sort, O(n log n) for n <= 1000

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use intake_common::SharedRingBuffer;
use intake_core::MonitoringFacade;
use intake_domain::{ApiCallRecord, FormSubmissionRecord, SecurityEvent};
use parking_lot::Mutex;
use serde::Serialize;

use crate::observability::{MetricsError, MetricsResult};

/// Api-call durations kept for percentile reads.
pub const LATENCY_WINDOW: usize = 1000;

/// Success and failure tallies for one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub succeeded: u64,
    pub failed: u64,
}

impl OutcomeCounts {
    fn record(&mut self, success: bool) {
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.succeeded + self.failed
    }
}

#[derive(Debug, Default)]
struct Breakdown {
    api_by_endpoint: BTreeMap<String, OutcomeCounts>,
    api_failures_by_kind: BTreeMap<String, u64>,
    submissions_by_kind: BTreeMap<String, OutcomeCounts>,
    submission_errors: BTreeMap<String, u64>,
    security_by_name: BTreeMap<String, u64>,
}

/// Point-in-time copy of every counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub api_calls: u64,
    pub api_failures: u64,
    pub submissions: u64,
    pub submission_failures: u64,
    pub security_events: u64,
    pub api_by_endpoint: BTreeMap<String, OutcomeCounts>,
    /// Failed api calls keyed by classified kind.
    pub api_failures_by_kind: BTreeMap<String, u64>,
    pub submissions_by_kind: BTreeMap<String, OutcomeCounts>,
    /// Failure codes and kinds reported with failed submissions.
    pub submission_errors: BTreeMap<String, u64>,
    pub security_by_name: BTreeMap<String, u64>,
}

/// Aggregating [`MonitoringFacade`].
#[derive(Debug)]
pub struct MetricsMonitor {
    api_calls: AtomicU64,
    api_failures: AtomicU64,
    submissions: AtomicU64,
    submission_failures: AtomicU64,
    security_events: AtomicU64,
    breakdown: Mutex<Breakdown>,
    latencies: SharedRingBuffer<u64>,
}

impl Default for MetricsMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsMonitor {
    pub fn new() -> Self {
        Self {
            api_calls: AtomicU64::new(0),
            api_failures: AtomicU64::new(0),
            submissions: AtomicU64::new(0),
            submission_failures: AtomicU64::new(0),
            security_events: AtomicU64::new(0),
            breakdown: Mutex::new(Breakdown::default()),
            latencies: SharedRingBuffer::new(LATENCY_WINDOW),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let breakdown = self.breakdown.lock();
        MetricsSnapshot {
            api_calls: self.api_calls.load(Ordering::SeqCst),
            api_failures: self.api_failures.load(Ordering::SeqCst),
            submissions: self.submissions.load(Ordering::SeqCst),
            submission_failures: self.submission_failures.load(Ordering::SeqCst),
            security_events: self.security_events.load(Ordering::SeqCst),
            api_by_endpoint: breakdown.api_by_endpoint.clone(),
            api_failures_by_kind: breakdown.api_failures_by_kind.clone(),
            submissions_by_kind: breakdown.submissions_by_kind.clone(),
            submission_errors: breakdown.submission_errors.clone(),
            security_by_name: breakdown.security_by_name.clone(),
        }
    }

    /// Fraction of api calls that failed, 0.0 before the first call.
    pub fn api_failure_rate(&self) -> f64 {
        let total = self.api_calls.load(Ordering::SeqCst);
        if total == 0 {
            return 0.0;
        }
        self.api_failures.load(Ordering::SeqCst) as f64 / total as f64
    }

    /// Number of latency samples currently held.
    pub fn latency_samples(&self) -> usize {
        self.latencies.len()
    }

    /// Returns `MetricsError::EmptyData` if no samples recorded.
    pub fn p50_latency_ms(&self) -> MetricsResult<u64> {
        self.percentile(0.50, "P50")
    }

    /// Returns `MetricsError::EmptyData` if no samples recorded.
    pub fn p95_latency_ms(&self) -> MetricsResult<u64> {
        self.percentile(0.95, "P95")
    }

    /// Returns `MetricsError::EmptyData` if no samples recorded.
    pub fn p99_latency_ms(&self) -> MetricsResult<u64> {
        self.percentile(0.99, "P99")
    }

    fn percentile(&self, percentile: f64, metric: &'static str) -> MetricsResult<u64> {
        let mut sorted = self.latencies.snapshot();
        if sorted.is_empty() {
            return Err(MetricsError::EmptyData { metric });
        }
        sorted.sort_unstable();

        let index = ((sorted.len() as f64 * percentile) as usize).min(sorted.len() - 1);
        Ok(sorted[index])
    }

    /// Zero every counter and drop all latency samples.
    pub fn reset(&self) {
        let mut breakdown = self.breakdown.lock();
        *breakdown = Breakdown::default();
        for counter in [
            &self.api_calls,
            &self.api_failures,
            &self.submissions,
            &self.submission_failures,
            &self.security_events,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
        self.latencies.clear();
    }
}

impl MonitoringFacade for MetricsMonitor {
    fn record_api_call(&self, record: &ApiCallRecord) {
        self.api_calls.fetch_add(1, Ordering::SeqCst);
        if !record.success {
            self.api_failures.fetch_add(1, Ordering::SeqCst);
        }
        self.latencies.push(record.duration_ms);

        let mut breakdown = self.breakdown.lock();
        breakdown.api_by_endpoint.entry(record.endpoint.clone()).or_default().record(record.success);
        if let Some(kind) = record.error {
            *breakdown.api_failures_by_kind.entry(kind.to_string()).or_default() += 1;
        }
    }

    fn record_form_submission(&self, record: &FormSubmissionRecord) {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        if !record.success {
            self.submission_failures.fetch_add(1, Ordering::SeqCst);
        }

        let mut breakdown = self.breakdown.lock();
        breakdown.submissions_by_kind.entry(record.kind.to_string()).or_default().record(record.success);
        for error in &record.errors {
            *breakdown.submission_errors.entry(error.clone()).or_default() += 1;
        }
    }

    fn record_security_event(&self, event: &SecurityEvent) {
        self.security_events.fetch_add(1, Ordering::SeqCst);
        *self.breakdown.lock().security_by_name.entry(event.name.clone()).or_default() += 1;
    }
}
