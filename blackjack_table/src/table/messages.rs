//! Table actor message types.

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use super::TableId;
use crate::game::{
    Command, RoundPhase, TableError, TableEvent,
    entities::{ConnectionId, DealerView, PlayerView},
};

/// Messages that can be sent to a TableActor
#[derive(Debug)]
pub enum TableMessage {
    /// Player command (join, bet, draw, stand, leave)
    Command {
        connection_id: ConnectionId,
        command: Command,
        response: oneshot::Sender<TableResponse>,
    },

    /// Get current table state
    GetState {
        response: oneshot::Sender<TableStateResponse>,
    },

    /// Subscribe a connection to table events
    Subscribe {
        connection_id: ConnectionId,
        sender: mpsc::Sender<TableEvent>,
    },

    /// Unsubscribe a connection from table events
    Unsubscribe { connection_id: ConnectionId },

    /// Close table
    Close {
        response: oneshot::Sender<TableResponse>,
    },
}

/// Response from table operations
#[derive(Debug, Clone, PartialEq)]
pub enum TableResponse {
    /// Command applied
    Success,

    /// Command rejected; the table is unchanged
    Rejected(TableError),
}

impl TableResponse {
    /// Check if response is success
    pub fn is_success(&self) -> bool {
        matches!(self, TableResponse::Success)
    }

    /// Get error message if the command was rejected
    pub fn error_message(&self) -> Option<String> {
        match self {
            TableResponse::Success => None,
            TableResponse::Rejected(e) => Some(e.to_string()),
        }
    }
}

impl From<Result<(), TableError>> for TableResponse {
    fn from(value: Result<(), TableError>) -> Self {
        match value {
            Ok(()) => TableResponse::Success,
            Err(e) => TableResponse::Rejected(e),
        }
    }
}

/// Table state response
#[derive(Debug, Clone, Serialize)]
pub struct TableStateResponse {
    /// Table ID
    pub table_id: TableId,

    /// Table name
    pub table_name: String,

    /// Current round phase
    pub phase: RoundPhase,

    /// Current player count
    pub player_count: usize,

    /// Maximum players
    pub max_players: usize,

    /// Seated players in join order
    pub players: Vec<PlayerView>,

    /// Dealer's current hand
    pub dealer: DealerView,

    /// Rounds resolved since the table opened
    pub rounds_played: u64,

    /// Connections receiving table events
    pub subscriber_count: usize,
}
