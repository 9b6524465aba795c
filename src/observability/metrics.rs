//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_calls_total` (counter): backend calls by operation, outcome
//! - `gateway_call_duration_seconds` (histogram): end-to-end call latency
//! - `gateway_transport_errors_total` (counter): transport failures by kind
//! - `gateway_domain_errors_total` (counter): resolved catalog codes
//!
//! Recording is a no-op until a recorder is installed, so library callers
//! and tests pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished call. `outcome` is `accepted`, `rejected` or `failed`.
pub fn record_call(operation: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!("gateway_calls_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("gateway_call_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_transport_error(kind: &'static str) {
    metrics::counter!("gateway_transport_errors_total", "kind" => kind).increment(1);
}

pub fn record_domain_error(code: &'static str) {
    metrics::counter!("gateway_domain_errors_total", "code" => code).increment(1);
}
