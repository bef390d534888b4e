//! Request metrics reporting.
//!
//! Every request the client dispatches is reported as a [`RequestRecord`] to
//! the [`MetricsCallback`] installed with
//! [`BackendClient::with_metrics`](crate::BackendClient::with_metrics).
//! [`Metrics`] is a ready-made collector built on atomic counters.
//!
//! ```rust
//! use std::sync::Arc;
//! use iam_backend::metrics::Metrics;
//!
//! let metrics = Arc::new(Metrics::new());
//! // let client = BackendClient::new(config)?.with_metrics(metrics.clone());
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.requests_total, 0);
//! ```

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use parking_lot::RwLock;

use crate::{
    ErrorKind,
    types::{Endpoint, Method},
};

/// Service label attached to every record.
pub const SERVICE_NAME: &str = "IAMBackend";

/// Outcome of one dispatched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    /// Always [`SERVICE_NAME`].
    pub service: &'static str,
    /// The endpoint method that issued the request, `None` for raw
    /// [`BackendClient::call`](crate::BackendClient::call) requests.
    pub endpoint: Option<Endpoint>,
    /// HTTP method.
    pub method: Method,
    /// Request path, without host or query string. Carries ids and system
    /// names, so it is informational; aggregate by `endpoint`.
    pub path: String,
    /// HTTP status, if the backend answered.
    pub status: Option<u16>,
    /// Time from sending the request to finishing decoding.
    pub duration: Duration,
    /// Error kind, or `None` on success.
    pub error: Option<ErrorKind>,
}

impl RequestRecord {
    /// Returns `true` if the call succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Receives a [`RequestRecord`] after every dispatched request.
///
/// Implementations must be cheap; they run inline on the calling task.
/// Closures taking `&RequestRecord` implement the trait.
pub trait MetricsCallback: Send + Sync {
    /// Called once per request, success or failure.
    fn on_request(&self, record: &RequestRecord);
}

impl<F> MetricsCallback for F
where
    F: Fn(&RequestRecord) + Send + Sync,
{
    fn on_request(&self, record: &RequestRecord) {
        self(record)
    }
}

/// Counter-based metrics collector.
#[derive(Debug, Default)]
pub struct Metrics {
    requests_total: AtomicU64,
    requests_failed: AtomicU64,
    latency_sum_ns: AtomicU64,
    latency_count: AtomicU64,
    per_endpoint: RwLock<HashMap<Endpoint, AtomicU64>>,
}

impl Metrics {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many requests `endpoint` dispatched.
    ///
    /// Raw calls count towards the totals only.
    pub fn endpoint_count(&self, endpoint: Endpoint) -> u64 {
        self.per_endpoint
            .read()
            .get(&endpoint)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Returns a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let count = self.latency_count.load(Ordering::Relaxed);
        let sum_ns = self.latency_sum_ns.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            latency_avg_ns: if count > 0 { sum_ns / count } else { 0 },
        }
    }

    /// Resets all metrics to zero.
    pub fn reset(&self) {
        self.requests_total.store(0, Ordering::Relaxed);
        self.requests_failed.store(0, Ordering::Relaxed);
        self.latency_sum_ns.store(0, Ordering::Relaxed);
        self.latency_count.store(0, Ordering::Relaxed);
        self.per_endpoint.write().clear();
    }

    // At most one entry per `Endpoint` variant.
    fn increment_endpoint(&self, endpoint: Endpoint) {
        let counters = self.per_endpoint.read();
        if let Some(counter) = counters.get(&endpoint) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
        drop(counters);

        self.per_endpoint
            .write()
            .entry(endpoint)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }
}

impl MetricsCallback for Metrics {
    fn on_request(&self, record: &RequestRecord) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        if !record.is_success() {
            self.requests_failed.fetch_add(1, Ordering::Relaxed);
        }
        let nanos = u64::try_from(record.duration.as_nanos()).unwrap_or(u64::MAX);
        self.latency_sum_ns.fetch_add(nanos, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);
        if let Some(endpoint) = record.endpoint {
            self.increment_endpoint(endpoint);
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Requests dispatched.
    pub requests_total: u64,
    /// Requests that ended in an error.
    pub requests_failed: u64,
    /// Average latency in nanoseconds.
    pub latency_avg_ns: u64,
}

impl MetricsSnapshot {
    /// Returns the average latency as a Duration.
    pub fn latency_avg(&self) -> Duration {
        Duration::from_nanos(self.latency_avg_ns)
    }

    /// Returns the error rate (0.0 - 1.0).
    pub fn error_rate(&self) -> f64 {
        if self.requests_total == 0 {
            return 0.0;
        }
        self.requests_failed as f64 / self.requests_total as f64
    }
}
