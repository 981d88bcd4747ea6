//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, route, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_upstream_fetches_total` (counter): refs fetches by outcome

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

pub const REQUESTS_TOTAL: &str = "gateway_requests_total";
pub const REQUEST_DURATION: &str = "gateway_request_duration_seconds";
pub const UPSTREAM_FETCHES: &str = "gateway_upstream_fetches_total";

/// Install the Prometheus recorder and its scrape listener.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests");
            describe_histogram!(REQUEST_DURATION, "HTTP request duration in seconds");
            describe_counter!(UPSTREAM_FETCHES, "Upstream refs fetches by outcome");
            tracing::info!(address = %addr, "Metrics endpoint listening");
        }
        Err(e) => tracing::error!(error = %e, "Failed to install metrics recorder"),
    }
}

/// Record one finished request.
pub fn record_request(method: &str, route: &'static str, status: u16, start: Instant) {
    counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        REQUEST_DURATION,
        "method" => method.to_string(),
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one upstream refs fetch.
pub fn record_upstream_fetch(outcome: &'static str) {
    counter!(UPSTREAM_FETCHES, "outcome" => outcome).increment(1);
}

/// Middleware recording request counts and latency.
///
/// Paths embed arbitrary repository names, so the route label is the
/// endpoint kind rather than the raw path.
pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = crate::routing::route_label(request.method(), request.uri().path());

    let response = next.run(request).await;

    record_request(&method, route, response.status().as_u16(), start);
    response
}
