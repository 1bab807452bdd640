//! Multi-table blackjack server using async actor model.
//!
//! This server spawns TableActor instances managed by TableManager and
//! serves them to browser clients over WebSockets.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use bj_server::{api, config::ServerConfig, logging, metrics};
use blackjack_table::table::TableManager;
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Run a multi-table blackjack server

USAGE:
  bj_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:3000]
  --tables     N           Number of tables to create  [default: env MAX_TABLES or 1]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  METRICS_BIND             Prometheus scrape address (metrics are off when unset)
  TABLE_MAX_PLAYERS        Seats per table (1-7)
  TABLE_STARTING_BALANCE   Balance each player starts with
  TABLE_SUBSCRIBER_BUFFER  Events buffered per connection
  RUST_LOG                 Log filter [default: info,tower_http=warn]
";

struct Args {
    bind: Option<SocketAddr>,
    num_tables: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        num_tables: pargs.opt_value_from_str("--tables")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.num_tables)?;
    config.validate()?;

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics at http://{}/metrics", metrics_bind);
    }

    let table_manager = Arc::new(TableManager::new());

    info!("Creating {} initial table(s)...", config.num_tables);
    for i in 0..config.num_tables {
        match table_manager
            .create_table(config.table_defaults.table_config(i))
            .await
        {
            Ok(table_id) => {
                info!("✓ Created table {} with ID {}", i + 1, table_id);
            }
            Err(e) => {
                log::error!("Failed to create table {}: {}", i + 1, e);
            }
        }
    }

    let active_count = table_manager.active_table_count().await;
    metrics::active_tables(active_count);
    info!("Server ready with {} active table(s)", active_count);

    match table_manager.list_tables().await {
        Ok(tables) => {
            info!("Active tables:");
            for table in tables {
                info!(
                    "  - {} (ID: {}) - {}/{} players",
                    table.name, table.id, table.player_count, table.max_players
                );
            }
        }
        Err(e) => {
            log::error!("Failed to list tables: {}", e);
        }
    }

    let api_state = api::AppState { table_manager };

    let app = api::create_router(api_state);

    info!("Starting HTTP/WebSocket server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
