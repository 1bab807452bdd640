//! Table configuration models.

use serde::{Deserialize, Serialize};

use crate::game::{
    GameSettings,
    constants::{DEFAULT_STARTING_BALANCE, MAX_PLAYERS},
    entities::Usd,
};

/// Table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table name
    pub name: String,

    /// Maximum number of seated players (default: 7)
    pub max_players: usize,

    /// Balance each player gets on joining (default: 1000)
    pub starting_balance: Usd,

    /// Events buffered per subscriber before new ones are dropped
    pub subscriber_buffer: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "Default Table".to_string(),
            max_players: MAX_PLAYERS,
            starting_balance: DEFAULT_STARTING_BALANCE,
            subscriber_buffer: 64,
        }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Table name can't be empty".to_string());
        }

        if self.max_players == 0 || self.max_players > MAX_PLAYERS {
            return Err(format!("Max players must be between 1 and {MAX_PLAYERS}"));
        }

        if self.starting_balance == 0 {
            return Err("Starting balance must be positive".to_string());
        }

        if self.subscriber_buffer == 0 {
            return Err("Subscriber buffer must be positive".to_string());
        }

        Ok(())
    }

    /// Rules handed to the table's state machine
    pub fn game_settings(&self) -> GameSettings {
        GameSettings::new(self.starting_balance, self.max_players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn test_max_players_bounds() {
        let mut config = TableConfig {
            max_players: 0,
            ..TableConfig::default()
        };
        assert!(config.validate().is_err());

        config.max_players = MAX_PLAYERS + 1;
        assert!(config.validate().is_err());

        config.max_players = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_starting_balance_rejected() {
        let config = TableConfig {
            starting_balance: 0,
            ..TableConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("Starting balance"));
    }

    #[test]
    fn test_game_settings_follow_config() {
        let config = TableConfig {
            max_players: 3,
            starting_balance: 250,
            ..TableConfig::default()
        };
        let settings = config.game_settings();
        assert_eq!(settings.max_players, 3);
        assert_eq!(settings.starting_balance, 250);
    }
}
