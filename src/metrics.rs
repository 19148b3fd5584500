//! Counters and latency histograms for the HTTP surface.

use std::time::Instant;

use axum::{extract::MatchedPath, extract::Request, middleware::Next, response::Response};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// Appointments created counter metric name.
pub const METRIC_APPOINTMENTS_CREATED: &str = "appointments_created_total";
/// Appointments removed counter metric name.
pub const METRIC_APPOINTMENTS_DELETED: &str = "appointments_deleted_total";
/// Lookups that matched no appointment.
pub const METRIC_APPOINTMENT_LOOKUP_MISSES: &str = "appointment_lookup_misses_total";

/// Initialize all metric descriptions.
/// Call this once at startup, after a recorder is installed.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests handled");
    describe_counter!(
        METRIC_APPOINTMENTS_CREATED,
        "Total number of appointments created"
    );
    describe_counter!(
        METRIC_APPOINTMENTS_DELETED,
        "Total number of appointment records removed"
    );
    describe_counter!(
        METRIC_APPOINTMENT_LOOKUP_MISSES,
        "Total number of id lookups that found nothing"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return its render handle.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &str, status: u16) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint.to_string()).record(latency_ms);
    counter!(
        METRIC_HTTP_REQUESTS,
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment appointments created counter.
pub fn inc_appointments_created() {
    counter!(METRIC_APPOINTMENTS_CREATED).increment(1);
}

/// Add to the appointments removed counter.
pub fn inc_appointments_deleted(removed: usize) {
    counter!(METRIC_APPOINTMENTS_DELETED).increment(removed as u64);
}

/// Increment lookup misses counter.
pub fn inc_lookup_misses() {
    counter!(METRIC_APPOINTMENT_LOOKUP_MISSES).increment(1);
}

/// Middleware recording latency and a request count per matched route.
pub async fn track_http(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_http_latency(start, &endpoint, response.status().as_u16());
    response
}
