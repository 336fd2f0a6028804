//! Metrics collection and exposition.
//!
//! # Metrics
//! - `noc_probes_total` (counter): probes by link and outcome
//! - `noc_state_transitions_total` (counter): confirmed transitions by link and status
//! - `noc_sink_errors_total` (counter): events that could not be recorded
//! - `noc_link_up` (gauge): 1=up, 0=down, per link

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::probe::ProbeOutcome;
use crate::tracker::{StateChangeEvent, Status};

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(link: &str, outcome: ProbeOutcome) {
    let outcome = match outcome {
        ProbeOutcome::Success => "success",
        ProbeOutcome::Failure => "failure",
    };
    ::metrics::counter!("noc_probes_total", "link" => link.to_string(), "outcome" => outcome)
        .increment(1);
}

pub fn record_transition(event: &StateChangeEvent) {
    ::metrics::counter!(
        "noc_state_transitions_total",
        "link" => event.link.clone(),
        "status" => event.status.as_str()
    )
    .increment(1);

    let up = if event.status == Status::Up { 1.0 } else { 0.0 };
    ::metrics::gauge!("noc_link_up", "link" => event.link.clone()).set(up);
}

pub fn record_sink_error() {
    ::metrics::counter!("noc_sink_errors_total").increment(1);
}
