//! Prometheus metrics for monitoring blackjack server health.
//!
//! Metrics are exposed in Prometheus text format for scraping by monitoring
//! systems. When no exporter is installed every call here is a no-op.
//!
//! # Metrics
//!
//! - `websocket_connections_active`: open WebSocket connections
//! - `websocket_connections_total`: connections accepted since start
//! - `inbound_events_total{event}`: client events received, by event name
//! - `rejected_commands_total`: commands the table refused
//! - `active_tables`: running tables
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use bj_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::inbound_event("placeBet");
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Sets up a Prometheus scrape endpoint on the specified address.
/// Metrics will be available at `http://<addr>/metrics`.
///
/// # Arguments
///
/// - `addr`: Address to bind the metrics server to (e.g., `0.0.0.0:9090`)
///
/// # Returns
///
/// Result indicating success or error message
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// WebSocket Metrics
// ============================================================================

/// Record a newly opened WebSocket connection.
pub fn websocket_connected() {
    metrics::gauge!("websocket_connections_active").increment(1.0);
    metrics::counter!("websocket_connections_total").increment(1);
}

/// Record a closed WebSocket connection.
pub fn websocket_disconnected() {
    metrics::gauge!("websocket_connections_active").decrement(1.0);
}

/// Count one inbound client event.
pub fn inbound_event(event: &'static str) {
    metrics::counter!("inbound_events_total", "event" => event).increment(1);
}

/// Count one command the table rejected.
pub fn rejected_command() {
    metrics::counter!("rejected_commands_total").increment(1);
}

// ============================================================================
// Table Metrics
// ============================================================================

/// Set current active tables count.
pub fn active_tables(count: usize) {
    metrics::gauge!("active_tables").set(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_exporter() {
        // No recorder installed: every call is a no-op
        websocket_connected();
        inbound_event("joinGame");
        rejected_command();
        websocket_disconnected();
        active_tables(2);
    }
}
