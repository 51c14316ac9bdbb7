//! Metrics collection and exposition.
//!
//! # Metrics
//! - `clinic_requests_total` (counter): requests by method, status
//! - `clinic_request_duration_seconds` (histogram): latency distribution
//! - `clinic_error_responses_total` (counter): error envelopes by status
//! - `clinic_retry_attempts_total` (counter): retries by error code
//! - `clinic_retry_outcomes_total` (counter): success / exhausted / not_retryable
//! - `clinic_fallback_total` (counter): executions by strategy and source
//! - `clinic_service_health` (gauge): 1=healthy, 0=unhealthy
//! - `clinic_rate_limited_total` (counter)
//! - `clinic_content_cache_entries` (gauge)
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!("clinic_requests_total", "method" => method.to_string(), "status" => status.clone())
        .increment(1);
    histogram!("clinic_request_duration_seconds", "method" => method.to_string(), "status" => status)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_error_response(status: u16) {
    counter!("clinic_error_responses_total", "status" => status.to_string()).increment(1);
}

pub fn record_retry_attempt(code: &'static str) {
    counter!("clinic_retry_attempts_total", "code" => code).increment(1);
}

pub fn record_retry_outcome(outcome: &'static str) {
    counter!("clinic_retry_outcomes_total", "outcome" => outcome).increment(1);
}

pub fn record_fallback(strategy: &'static str, source: &'static str) {
    counter!("clinic_fallback_total", "strategy" => strategy, "source" => source).increment(1);
}

pub fn record_service_health(strategy: &'static str, healthy: bool) {
    gauge!("clinic_service_health", "strategy" => strategy).set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_rate_limited(reason: &'static str) {
    counter!("clinic_rate_limited_total", "reason" => reason).increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("clinic_content_cache_entries").set(entries as f64);
}
