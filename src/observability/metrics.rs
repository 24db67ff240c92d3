//! Metrics collection and exposition.
//!
//! # Metrics
//! - `controller_reloads_total` (counter): commits that changed the proxy
//! - `controller_reloads_skipped_total` (counter): commits suppressed as
//!   equivalent to the applied configuration
//! - `controller_reload_failures_total` (counter): reload hook failures

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

pub const RELOADS_TOTAL: &str = "controller_reloads_total";
pub const RELOADS_SKIPPED_TOTAL: &str = "controller_reloads_skipped_total";
pub const RELOAD_FAILURES_TOTAL: &str = "controller_reload_failures_total";

/// Install the Prometheus exporter and register metric descriptions.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }

    metrics::describe_counter!(RELOADS_TOTAL, "Commits that reloaded the proxy");
    metrics::describe_counter!(
        RELOADS_SKIPPED_TOTAL,
        "Commits suppressed as equivalent to the applied configuration"
    );
    metrics::describe_counter!(RELOAD_FAILURES_TOTAL, "Reload hook failures");
}
