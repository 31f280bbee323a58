//! Metrics collection and exposition.
//!
//! # Metrics
//! - `meta_router_decisions_total` (counter): routing outcomes by `outcome`
//!   (`matched`, `no_route`)
//! - `meta_router_reloads_total` (counter): reloads by `status`
//! - `meta_router_routes` (gauge): rules in the active matcher
//!
//! Recording is a no-op until a recorder is installed, so the library can be
//! embedded without an exporter.

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!("meta_router_decisions_total", "Routing decisions by outcome");
    describe_counter!("meta_router_reloads_total", "Route table reloads by status");
    describe_gauge!("meta_router_routes", "Rules in the active route matcher");

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record the outcome of one routing decision.
pub fn record_decision(matched: bool) {
    let outcome = if matched { "matched" } else { "no_route" };
    counter!("meta_router_decisions_total", "outcome" => outcome).increment(1);
}

/// Record a configuration reload attempt.
pub fn record_reload(success: bool) {
    let status = if success { "success" } else { "rejected" };
    counter!("meta_router_reloads_total", "status" => status).increment(1);
}

/// Update the active rule count.
pub fn set_route_count(routes: usize) {
    gauge!("meta_router_routes").set(routes as f64);
}
