//! # Metrics
//!
//! Prometheus metrics for monitoring the operator.
//!
//! ## Metrics Exposed
//!
//! - `uptimerobot_operator_reconciliations_total` - Handler invocations by kind and operation
//! - `uptimerobot_operator_reconciliation_errors_total` - Handler failures by kind and class
//! - `uptimerobot_operator_reconciliation_duration_seconds` - Handler duration by kind
//! - `uptimerobot_operator_api_requests_total` - UptimeRobot API calls by method and outcome
//! - `uptimerobot_operator_api_request_duration_seconds` - UptimeRobot API latency by method
//! - `uptimerobot_operator_route_children_total` - Monitors created/updated/deleted for Ingresses

use anyhow::Result;
use prometheus::{HistogramVec, IntCounterVec, Registry};
use std::sync::LazyLock;

// Metrics
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RECONCILIATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "uptimerobot_operator_reconciliations_total",
            "Total number of handler invocations by resource kind and operation",
        ),
        &["kind", "operation"],
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "uptimerobot_operator_reconciliation_errors_total",
            "Total number of handler failures by resource kind and error class",
        ),
        &["kind", "class"],
    )
    .expect("Failed to create RECONCILIATION_ERRORS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "uptimerobot_operator_reconciliation_duration_seconds",
            "Duration of handler invocations in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
        &["kind"],
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

static API_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "uptimerobot_operator_api_requests_total",
            "Total number of UptimeRobot API requests by method and outcome",
        ),
        &["method", "outcome"],
    )
    .expect("Failed to create API_REQUESTS_TOTAL metric - this should never happen")
});

static API_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "uptimerobot_operator_api_request_duration_seconds",
            "Duration of UptimeRobot API requests in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method"],
    )
    .expect("Failed to create API_REQUEST_DURATION metric - this should never happen")
});

static ROUTE_CHILDREN_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "uptimerobot_operator_route_children_total",
            "Total number of monitors derived from Ingresses by action",
        ),
        &["action"],
    )
    .expect("Failed to create ROUTE_CHILDREN_TOTAL metric - this should never happen")
});

#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
/// Register all metrics with the process-wide registry
///
/// Fails if called twice.
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(API_REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(API_REQUEST_DURATION.clone()))?;
    REGISTRY.register(Box::new(ROUTE_CHILDREN_TOTAL.clone()))?;

    Ok(())
}

pub fn increment_reconciliations(kind: &str, operation: &str) {
    RECONCILIATIONS_TOTAL
        .with_label_values(&[kind, operation])
        .inc();
}

pub fn increment_reconciliation_errors(kind: &str, class: &str) {
    RECONCILIATION_ERRORS_TOTAL
        .with_label_values(&[kind, class])
        .inc();
}

pub fn observe_reconciliation_duration(kind: &str, duration: f64) {
    RECONCILIATION_DURATION
        .with_label_values(&[kind])
        .observe(duration);
}

/// Record one UptimeRobot API call; `outcome` is `ok`, `fail` or `error`
pub fn record_api_request(method: &str, outcome: &str, duration: f64) {
    API_REQUESTS_TOTAL
        .with_label_values(&[method, outcome])
        .inc();
    API_REQUEST_DURATION
        .with_label_values(&[method])
        .observe(duration);
}

pub fn increment_route_children(action: &str, count: usize) {
    ROUTE_CHILDREN_TOTAL
        .with_label_values(&[action])
        .inc_by(count as u64);
}
