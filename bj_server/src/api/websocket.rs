//! WebSocket handler for real-time play.
//!
//! Every connection gets its own identity and its own event channel on the
//! table it connected to. Events the table emits are forwarded as text
//! frames in the order the table produced them.
//!
//! # Connection Flow
//!
//! 1. Client connects via `GET /ws/{table_id}`
//! 2. Server subscribes the connection to the table and immediately sends
//!    the current players and dealer hand
//! 3. Server spawns a send task that forwards table events to the socket
//! 4. Incoming frames are decoded and applied to the table as commands
//! 5. On disconnect the player leaves the table and the subscription ends
//!
//! # Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:3000/ws/1');
//!
//! ws.onmessage = (msg) => {
//!   const { event, data } = JSON.parse(msg.data);
//!   if (event === 'gameResult') alert(data);
//! };
//!
//! ws.send(JSON.stringify({ event: 'joinGame', data: 'alice' }));
//! ws.send(JSON.stringify({ event: 'placeBet', data: 50 }));
//! ```

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use blackjack_table::{
    Command, TableEvent,
    entities::ConnectionId,
    table::{TableHandle, TableId, TableResponse},
    utils::{decode_client_message, encode_event},
};
use futures_util::{SinkExt, StreamExt};
use log::{error, info, warn};
use tokio::sync::mpsc;

use super::AppState;
use crate::{logging, metrics};

/// Upgrade HTTP connection to WebSocket for play at the given table.
///
/// # Response
///
/// On success, upgrades connection to WebSocket protocol (101 Switching Protocols).
/// Unknown tables get `404 Not Found` without upgrading.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(table_id): Path<TableId>,
    State(state): State<AppState>,
) -> Response {
    let Some(table_handle) = state.table_manager.get_table(table_id).await else {
        return (StatusCode::NOT_FOUND, "Table not found").into_response();
    };

    ws.on_upgrade(move |socket| handle_socket(socket, table_handle))
}

/// Handle an established WebSocket connection.
///
/// # Arguments
///
/// - `socket`: The WebSocket connection
/// - `table`: Handle of the table the connection plays at
async fn handle_socket(socket: WebSocket, table: TableHandle) {
    let connection_id = ConnectionId::new();
    let table_id = table.table_id();
    let connection = connection_id.to_string();
    let (mut sender, mut receiver) = socket.split();

    info!("WebSocket connected: table={}, connection={}", table_id, connection_id);
    metrics::websocket_connected();

    // Rejections are queued on the same channel as table events so the
    // client sees them in order.
    let (event_tx, mut event_rx) = mpsc::channel::<TableEvent>(table.subscriber_buffer());
    let reply_tx = event_tx.clone();

    if let Err(e) = table.subscribe(connection_id, event_tx).await {
        error!("Failed to subscribe to table {}: {}", table_id, e);
        metrics::websocket_disconnected();
        return;
    }

    let send_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let json = match encode_event(&event) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize {}: {}", event.name(), e);
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let client_msg = match decode_client_message(text.as_str()) {
                    Ok(client_msg) => client_msg,
                    Err(e) => {
                        warn!("Bad message from {}: {}", connection_id, e);
                        reject(&reply_tx, format!("Invalid message: {e}"));
                        continue;
                    }
                };

                metrics::inbound_event(client_msg.event_name());
                logging::log_table_event(table_id, &connection, client_msg.event_name());

                match table.command(connection_id, client_msg.into()).await {
                    Ok(TableResponse::Success) => {}
                    Ok(TableResponse::Rejected(e)) => {
                        let reason = e.to_string();
                        metrics::rejected_command();
                        logging::log_rejection(table_id, &connection, &reason);
                        reject(&reply_tx, reason);
                    }
                    Err(e) => {
                        warn!("Table {} unavailable: {}", table_id, e);
                        break;
                    }
                }
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket closed: table={}, connection={}", table_id, connection_id);
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    send_task.abort();

    // Disconnecting is leaving
    let _ = table.unsubscribe(connection_id).await;
    match table.command(connection_id, Command::Leave).await {
        Ok(TableResponse::Success) => {
            info!(
                "Connection {} automatically left table {} on disconnect",
                connection_id, table_id
            );
        }
        Ok(TableResponse::Rejected(_)) => {
            // Never joined, or the table already dropped them
        }
        Err(e) => {
            warn!("Failed to leave table {} on disconnect: {}", table_id, e);
        }
    }

    metrics::websocket_disconnected();
    info!(
        "WebSocket disconnected: table={}, connection={}",
        table_id, connection_id
    );
}

/// Tell this connection alone that its last message was refused.
fn reject(reply_tx: &mpsc::Sender<TableEvent>, reason: String) {
    if reply_tx.try_send(TableEvent::ActionRejected(reason)).is_err() {
        warn!("Dropping actionRejected: connection channel full");
    }
}
