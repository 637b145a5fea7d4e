//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_resolutions_total` (counter): resolutions by outcome (hit, miss)
//! - `router_navigations_total` (counter): navigations by outcome
//! - `router_navigation_duration_seconds` (histogram): resolve-to-commit time
//! - `router_view_loads_total` (counter): view loads by outcome
//! - `router_view_load_duration_seconds` (histogram): view load latency
//! - `router_routes` (gauge): records in the active route tree
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - The Prometheus exporter is optional and configured at startup

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_resolution(hit: bool) {
    let outcome = if hit { "hit" } else { "miss" };
    counter!("router_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_navigation(outcome: &'static str, start: Instant) {
    counter!("router_navigations_total", "outcome" => outcome).increment(1);
    histogram!("router_navigation_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_view_load(ok: bool, start: Instant) {
    let outcome = if ok { "ok" } else { "error" };
    counter!("router_view_loads_total", "outcome" => outcome).increment(1);
    histogram!("router_view_load_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_route_count(count: usize) {
    gauge!("router_routes").set(count as f64);
}
