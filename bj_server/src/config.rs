//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use blackjack_table::{
    constants::{DEFAULT_STARTING_BALANCE, MAX_PLAYERS},
    entities::Usd,
    table::TableConfig,
};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Bind address used when neither `--bind` nor `SERVER_BIND` is given
pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 3000));

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus scrape endpoint; metrics are off when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Table defaults configuration
    pub table_defaults: TableDefaultsConfig,
    /// Number of tables to create on startup
    pub num_tables: usize,
}

/// Default table configuration
#[derive(Debug, Clone)]
pub struct TableDefaultsConfig {
    /// Maximum players per table
    pub max_players: usize,
    /// Balance each player starts with
    pub starting_balance: Usd,
    /// Events buffered per connection before new ones are dropped
    pub subscriber_buffer: usize,
}

impl Default for TableDefaultsConfig {
    fn default() -> Self {
        Self {
            max_players: MAX_PLAYERS,
            starting_balance: DEFAULT_STARTING_BALANCE,
            subscriber_buffer: 64,
        }
    }
}

impl TableDefaultsConfig {
    /// Config for the `index`th table (zero-based)
    pub fn table_config(&self, index: usize) -> TableConfig {
        TableConfig {
            name: format!("Table {}", index + 1),
            max_players: self.max_players,
            starting_balance: self.starting_balance,
            subscriber_buffer: self.subscriber_buffer,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `num_tables_override` - Optional number of tables override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but can't be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        num_tables_override: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_addr("SERVER_BIND", std::env::var("SERVER_BIND").ok())?
                .unwrap_or(DEFAULT_BIND),
        };

        let metrics_bind = parse_addr("METRICS_BIND", std::env::var("METRICS_BIND").ok())?;

        let defaults = TableDefaultsConfig::default();
        let table_defaults = TableDefaultsConfig {
            max_players: parse_env_or("TABLE_MAX_PLAYERS", defaults.max_players),
            starting_balance: parse_env_or("TABLE_STARTING_BALANCE", defaults.starting_balance),
            subscriber_buffer: parse_env_or("TABLE_SUBSCRIBER_BUFFER", defaults.subscriber_buffer),
        };

        let num_tables = num_tables_override.unwrap_or_else(|| parse_env_or("MAX_TABLES", 1));

        Ok(ServerConfig {
            bind,
            metrics_bind,
            table_defaults,
            num_tables,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_tables == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_TABLES".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if self.table_defaults.max_players == 0 || self.table_defaults.max_players > MAX_PLAYERS {
            return Err(ConfigError::Invalid {
                var: "TABLE_MAX_PLAYERS".to_string(),
                reason: format!("Must be between 1 and {MAX_PLAYERS}"),
            });
        }

        if self.table_defaults.starting_balance == 0 {
            return Err(ConfigError::Invalid {
                var: "TABLE_STARTING_BALANCE".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.table_defaults.subscriber_buffer == 0 {
            return Err(ConfigError::Invalid {
                var: "TABLE_SUBSCRIBER_BUFFER".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server address ({})", self.bind),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse an optional socket address, naming the variable on failure
fn parse_addr(var: &str, value: Option<String>) -> Result<Option<SocketAddr>, ConfigError> {
    value
        .map(|v| {
            v.parse().map_err(|e| ConfigError::Invalid {
                var: var.to_string(),
                reason: format!("{v:?} is not a socket address: {e}"),
            })
        })
        .transpose()
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
