//! Prometheus metrics for the relay.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "hoopstats_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "hoopstats_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "hoopstats_http_requests_in_flight";

    // Gateway relay metrics
    pub const RELAY_REQUESTS_TOTAL: &str = "hoopstats_relay_requests_total";
    pub const RELAY_DURATION_SECONDS: &str = "hoopstats_relay_duration_seconds";
    pub const RELAY_FAILURES_TOTAL: &str = "hoopstats_relay_failures_total";
    pub const RELAY_BYTES_TOTAL: &str = "hoopstats_relay_bytes_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a round trip to the gateway.
pub fn record_relay_request(route: &str, status: u16, duration_secs: f64) {
    let labels = [("route", route.to_string()), ("status", status.to_string())];

    counter!(names::RELAY_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::RELAY_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a relay attempt the gateway never answered.
pub fn record_relay_failure(route: &str) {
    let labels = [("route", route.to_string())];
    counter!(names::RELAY_FAILURES_TOTAL, &labels).increment(1);
}

/// Record payload bytes moved through the relay.
pub fn record_relay_bytes(route: &str, bytes: u64) {
    let labels = [("route", route.to_string())];
    counter!(names::RELAY_BYTES_TOTAL, &labels).increment(bytes);
}

/// Sanitize path for metrics labels (collapse job ids).
fn sanitize_path(path: &str) -> String {
    let path = regex_lite::Regex::new(r"/api/status/[^/]+")
        .unwrap()
        .replace_all(path, "/api/status/:job_id");
    let path = regex_lite::Regex::new(r"/api/download/[^/]+")
        .unwrap()
        .replace_all(&path, "/api/download/:job_id");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/status/550e8400-e29b-41d4-a716-446655440000"),
            "/api/status/:job_id"
        );
        assert_eq!(sanitize_path("/api/download/job-42"), "/api/download/:job_id");
        assert_eq!(sanitize_path("/api/upload"), "/api/upload");
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
