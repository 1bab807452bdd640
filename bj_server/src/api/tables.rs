//! Table discovery API handlers.
//!
//! Read-only endpoints for lobby screens and monitoring. Playing happens
//! over the WebSocket.
//!
//! # Examples
//!
//! List all tables:
//! ```bash
//! curl http://localhost:3000/api/v1/tables
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use blackjack_table::{
    RoundPhase,
    entities::{DealerView, PlayerView},
    table::{TableId, TableMetadata},
};
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct TableListItem {
    pub id: TableId,
    pub name: String,
    pub phase: RoundPhase,
    pub player_count: usize,
    pub max_players: usize,
}

impl From<TableMetadata> for TableListItem {
    fn from(metadata: TableMetadata) -> Self {
        Self {
            id: metadata.id,
            name: metadata.name,
            phase: metadata.phase,
            player_count: metadata.player_count,
            max_players: metadata.max_players,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TableSummaryResponse {
    pub id: TableId,
    pub name: String,
    pub phase: RoundPhase,
    pub max_players: usize,
    pub players: Vec<PlayerView>,
    pub dealer: DealerView,
    pub rounds_played: u64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// List all running tables.
///
/// # Response
///
/// Returns `200 OK` with array of table summaries:
/// ```json
/// [
///   {
///     "id": 1,
///     "name": "Table 1",
///     "phase": "BETTING",
///     "player_count": 2,
///     "max_players": 7
///   }
/// ]
/// ```
pub async fn list_tables(
    State(state): State<AppState>,
) -> Result<Json<Vec<TableListItem>>, (StatusCode, Json<ErrorResponse>)> {
    match state.table_manager.list_tables().await {
        Ok(tables) => Ok(Json(tables.into_iter().map(TableListItem::from).collect())),
        Err(e) => {
            log::error!("Failed to list tables: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list tables".to_string(),
                }),
            ))
        }
    }
}

/// Get a single table's current state: phase, seated players, and the
/// dealer's hand.
///
/// Returns `404 Not Found` for unknown table IDs.
pub async fn get_table(
    State(state): State<AppState>,
    Path(table_id): Path<TableId>,
) -> Result<Json<TableSummaryResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.table_manager.get_table_state(table_id).await {
        Ok(table) => Ok(Json(TableSummaryResponse {
            id: table.table_id,
            name: table.table_name,
            phase: table.phase,
            max_players: table.max_players,
            players: table.players,
            dealer: table.dealer,
            rounds_played: table.rounds_played,
        })),
        Err(e) => Err((StatusCode::NOT_FOUND, Json(ErrorResponse { error: e }))),
    }
}
