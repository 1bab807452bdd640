//! Structured logging configuration.
//!
//! The table library logs through the `log` facade; the subscriber installed
//! here picks those records up alongside the server's own `tracing` events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` isn't set
pub const DEFAULT_FILTER: &str = "info,tower_http=warn";

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use bj_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a player event on a table with structured fields
pub fn log_table_event(table_id: i64, connection: &str, event: &str) {
    tracing::debug!(
        table_id = table_id,
        connection = connection,
        event = event,
        "Inbound event"
    );
}

/// Log a rejected command with structured fields
pub fn log_rejection(table_id: i64, connection: &str, reason: &str) {
    tracing::info!(
        table_id = table_id,
        connection = connection,
        reason = reason,
        "Command rejected"
    );
}
