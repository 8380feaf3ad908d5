//! Metrics and observability utilities
//!
//! Records remote call, mutation and view-load metrics through the
//! `metrics` facade. Nothing is exported unless the binary installs a
//! recorder.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all ReservoirOS metrics
pub const METRICS_PREFIX: &str = "reservoiros";

/// Histogram buckets for remote call latency (in seconds).
/// Upper bound matches the 30s transport timeout.
pub const LATENCY_BUCKETS: &[f64] = &[
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
    30.00,  // 30s
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_api_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of remote API requests"
    );

    describe_histogram!(
        format!("{}_api_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Remote API request latency in seconds"
    );

    describe_counter!(
        format!("{}_mutations_total", METRICS_PREFIX),
        Unit::Count,
        "Create, update and delete operations by outcome"
    );

    describe_counter!(
        format!("{}_view_loads_total", METRICS_PREFIX),
        Unit::Count,
        "View dependency batches by outcome"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record remote request metrics
pub struct RequestMetrics {
    start: Instant,
    method: String,
    collection: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, collection: &str) -> Self {
        Self {
            start: Instant::now(),
            method: method.to_string(),
            collection: collection.to_string(),
        }
    }

    /// Record request completion. `status` is 0 when no response arrived.
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_api_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "collection" => self.collection.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_api_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "collection" => self.collection
        )
        .record(duration);
    }
}

/// Helper to record mutation metrics
pub fn record_mutation(entity: &'static str, action: &'static str, success: bool) {
    let outcome = if success { "success" } else { "error" };

    counter!(
        format!("{}_mutations_total", METRICS_PREFIX),
        "entity" => entity,
        "action" => action,
        "outcome" => outcome
    )
    .increment(1);
}

/// Helper to record a settled dependency batch
pub fn record_view_load(view: &'static str, failed: usize) {
    let outcome = if failed == 0 { "complete" } else { "partial" };

    counter!(
        format!("{}_view_loads_total", METRICS_PREFIX),
        "view" => view,
        "outcome" => outcome
    )
    .increment(1);
}

/// First path segment, used as the collection label
pub fn collection_label(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or_default()
}
