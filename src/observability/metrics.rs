//! Metrics collection and exposition.
//!
//! # Metrics
//! - `forwarder_requests_total` (counter): requests by route, method, status
//! - `forwarder_request_duration_seconds` (histogram): latency by route
//! - `forwarder_upstream_errors_total` (counter): upstream failures by kind
//! - `forwarder_redirects_rewritten_total` (counter): `Location` headers mapped onto the mount
//!
//! Recording is a no-op until a recorder is installed, so tests need no setup.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &'static str, method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "forwarder_requests_total",
        "route" => route,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("forwarder_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error(kind: &'static str) {
    metrics::counter!("forwarder_upstream_errors_total", "kind" => kind).increment(1);
}

pub fn record_redirect_rewritten() {
    metrics::counter!("forwarder_redirects_rewritten_total").increment(1);
}
