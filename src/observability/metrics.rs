//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dapp_transfers_total` (counter): transfers by outcome (submitted, confirmed, failed)
//! - `dapp_validation_failures_total` (counter): rejected submissions by field
//! - `dapp_forced_disconnects_total` (counter): stale sessions torn down
//! - `dapp_chain_connected` (gauge): 1=chain client connected, 0=not
//! - `dapp_network_switch_total` (counter): switch attempts by outcome
//!
//! Recording is a no-op until an exporter is installed.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_transfer(outcome: &'static str) {
    metrics::counter!("dapp_transfers_total", "outcome" => outcome).increment(1);
}

pub fn record_validation_failure(field: &'static str) {
    metrics::counter!("dapp_validation_failures_total", "field" => field).increment(1);
}

pub fn record_forced_disconnect() {
    metrics::counter!("dapp_forced_disconnects_total").increment(1);
}

pub fn record_chain_connected(connected: bool) {
    metrics::gauge!("dapp_chain_connected").set(if connected { 1.0 } else { 0.0 });
}

pub fn record_network_switch(outcome: &'static str) {
    metrics::counter!("dapp_network_switch_total", "outcome" => outcome).increment(1);
}
