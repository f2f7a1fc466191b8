//! Metrics collection and exposition.
//!
//! # Metrics
//! - `balance_requests_total` (counter): endpoint responses by status
//! - `balance_request_duration_seconds` (histogram): endpoint latency
//! - `balance_provider_fetches_total` (counter): provider calls by outcome
//! - `balance_cache_lookups_total` (counter): hit / expired / miss
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record an endpoint response.
pub fn record_request(status: u16, start: Instant) {
    counter!("balance_requests_total", "status" => status.to_string()).increment(1);
    histogram!("balance_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one provider call; `outcome` is `"ok"` or a fetch error kind.
pub fn record_fetch(outcome: &'static str) {
    counter!("balance_provider_fetches_total", "outcome" => outcome).increment(1);
}

/// Record a fresh-cache lookup.
pub fn record_cache_lookup(result: &'static str) {
    counter!("balance_cache_lookups_total", "result" => result).increment(1);
}
