//! Metrics collection and exposition.
//!
//! # Metrics
//! - `boundary_body_bytes_total` (counter): bytes of fully received bodies
//! - `boundary_body_rejected_total` (counter): body reads that failed, by reason
//! - `boundary_forms_decoded_total` (counter): form decodes, by kind
//! - `boundary_static_responses_total` (counter): static responses, by status
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so library users
//!   and unit tests pay nothing
//! - Prometheus exposition is opt-in from the binary

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_body_bytes(bytes: usize) {
    metrics::counter!("boundary_body_bytes_total").increment(bytes as u64);
}

pub fn record_body_rejected(reason: &'static str) {
    metrics::counter!("boundary_body_rejected_total", "reason" => reason).increment(1);
}

pub fn record_form_decoded(kind: &'static str) {
    metrics::counter!("boundary_forms_decoded_total", "kind" => kind).increment(1);
}

pub fn record_static_response(status: u16) {
    metrics::counter!("boundary_static_responses_total", "status" => status.to_string()).increment(1);
}
