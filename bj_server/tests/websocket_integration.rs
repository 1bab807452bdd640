//! WebSocket integration tests for real-time blackjack play.
//!
//! Runs the real server on a random port and plays through it with
//! tokio-tungstenite clients.

use blackjack_table::table::{TableConfig, TableManager};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpStream, time::timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Helper to start a server with one table, returning its address
async fn start_server() -> SocketAddr {
    let table_manager = Arc::new(TableManager::new());
    table_manager
        .create_table(TableConfig::default())
        .await
        .unwrap();

    let state = bj_server::api::AppState { table_manager };
    let app = bj_server::api::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Connect and consume the snapshot every new connection receives
async fn connect(addr: SocketAddr) -> Client {
    let (mut ws, _) = connect_async(format!("ws://{addr}/ws/1")).await.unwrap();
    assert_eq!(next_event(&mut ws).await["event"], "updatePlayers");
    assert_eq!(next_event(&mut ws).await["event"], "updateDealer");
    ws
}

async fn send(ws: &mut Client, value: Value) {
    ws.send(Message::Text(value.to_string().into())).await.unwrap();
}

async fn next_event(ws: &mut Client) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for an event")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Read events until one with the given name arrives
async fn wait_for(ws: &mut Client, name: &str) -> Value {
    loop {
        let event = next_event(ws).await;
        if event["event"] == name {
            return event;
        }
    }
}

// ============================================================================
// WebSocket Connection Tests
// ============================================================================

#[tokio::test]
async fn test_connection_to_unknown_table_fails() {
    let addr = start_server().await;
    let result = connect_async(format!("ws://{addr}/ws/99")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_join_broadcasts_players() {
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    let mut watcher = connect(addr).await;

    send(&mut alice, json!({"event": "joinGame", "data": "alice"})).await;

    for ws in [&mut alice, &mut watcher] {
        let event = next_event(ws).await;
        assert_eq!(event["event"], "updatePlayers");
        assert_eq!(event["data"][0]["name"], "alice");
        assert_eq!(event["data"][0]["balance"], 1000);
        assert_eq!(event["data"][0]["hand"], json!([]));
    }
}

// ============================================================================
// Gameplay Tests
// ============================================================================

#[tokio::test]
async fn test_single_player_round() {
    let addr = start_server().await;
    let mut alice = connect(addr).await;

    send(&mut alice, json!({"event": "joinGame", "data": "alice"})).await;
    wait_for(&mut alice, "updatePlayers").await;

    send(&mut alice, json!({"event": "placeBet", "data": 100})).await;
    let start = wait_for(&mut alice, "startGame").await;
    assert_eq!(start["data"]["players"][0]["hand"].as_array().unwrap().len(), 2);
    assert_eq!(start["data"]["dealer"]["hand"].as_array().unwrap().len(), 1);
    let card = &start["data"]["dealer"]["hand"][0];
    assert!(card["suit"].is_string());
    assert!(card["value"].is_string());

    send(&mut alice, json!({"event": "stand"})).await;
    let dealer = wait_for(&mut alice, "updateDealer").await;
    assert!(dealer["data"]["score"].as_u64().unwrap() >= 17);

    let result = wait_for(&mut alice, "gameResult").await;
    let message = result["data"].as_str().unwrap();
    assert!(["You win!", "It's a tie!", "You lose."].contains(&message));

    let players = wait_for(&mut alice, "updatePlayers").await;
    assert_eq!(players["data"][0]["bet"], 0);
    assert_eq!(players["data"][0]["hand"], json!([]));
}

#[tokio::test]
async fn test_rejected_action_only_reaches_sender() {
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;

    send(&mut alice, json!({"event": "placeBet", "data": 10})).await;
    let rejected = next_event(&mut alice).await;
    assert_eq!(rejected["event"], "actionRejected");
    assert_eq!(rejected["data"], "not at the table");

    // Bob sees the next real event, not alice's rejection
    send(&mut bob, json!({"event": "joinGame", "data": "bob"})).await;
    assert_eq!(next_event(&mut bob).await["event"], "updatePlayers");
}

#[tokio::test]
async fn test_malformed_message_rejected() {
    let addr = start_server().await;
    let mut alice = connect(addr).await;

    alice
        .send(Message::Text("{not json".to_string().into()))
        .await
        .unwrap();
    let rejected = next_event(&mut alice).await;
    assert_eq!(rejected["event"], "actionRejected");
    assert!(rejected["data"].as_str().unwrap().starts_with("Invalid message"));

    // The connection stays usable
    send(&mut alice, json!({"event": "joinGame", "data": "alice"})).await;
    assert_eq!(next_event(&mut alice).await["event"], "updatePlayers");
}

#[tokio::test]
async fn test_disconnect_finishes_round_for_others() {
    let addr = start_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;

    send(&mut alice, json!({"event": "joinGame", "data": "alice"})).await;
    wait_for(&mut bob, "updatePlayers").await;
    send(&mut bob, json!({"event": "joinGame", "data": "bob"})).await;
    wait_for(&mut bob, "updatePlayers").await;

    send(&mut alice, json!({"event": "placeBet", "data": 10})).await;
    send(&mut bob, json!({"event": "placeBet", "data": 10})).await;
    wait_for(&mut alice, "startGame").await;

    send(&mut alice, json!({"event": "stand"})).await;
    // Alice's stand has been applied once its update comes back
    loop {
        let event = wait_for(&mut alice, "updatePlayers").await;
        if event["data"][0]["isStanding"] == true {
            break;
        }
    }

    bob.close(None).await.unwrap();

    let result = wait_for(&mut alice, "gameResult").await;
    assert!(result["data"].is_string());
    let players = wait_for(&mut alice, "updatePlayers").await;
    assert_eq!(players["data"].as_array().unwrap().len(), 1);
}
