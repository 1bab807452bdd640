//! Table actor implementation with async message handling.

use super::{
    TableId,
    config::TableConfig,
    messages::{TableMessage, TableResponse, TableStateResponse},
    notifier::{Notifier, SubscriberNotifier},
};
use crate::game::{Command, Table, TableEvent, entities::ConnectionId};
use tokio::sync::{mpsc, oneshot};

/// Table actor handle for sending messages
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
    table_id: TableId,
    subscriber_buffer: usize,
}

impl TableHandle {
    /// Create a new table handle
    pub fn new(
        sender: mpsc::Sender<TableMessage>,
        table_id: TableId,
        subscriber_buffer: usize,
    ) -> Self {
        Self {
            sender,
            table_id,
            subscriber_buffer,
        }
    }

    /// Get table ID
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Capacity subscribers should give their event channel
    pub fn subscriber_buffer(&self) -> usize {
        self.subscriber_buffer
    }

    /// Send a message to the table
    pub async fn send(&self, message: TableMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .await
            .map_err(|_| "Table is closed".to_string())
    }

    /// Apply a command on behalf of a connection and wait for the outcome
    pub async fn command(
        &self,
        connection_id: ConnectionId,
        command: Command,
    ) -> Result<TableResponse, String> {
        let (tx, rx) = oneshot::channel();
        self.send(TableMessage::Command {
            connection_id,
            command,
            response: tx,
        })
        .await?;
        rx.await.map_err(|_| "Table dropped the request".to_string())
    }

    /// Get a snapshot of the table
    pub async fn state(&self) -> Result<TableStateResponse, String> {
        let (tx, rx) = oneshot::channel();
        self.send(TableMessage::GetState { response: tx }).await?;
        rx.await.map_err(|_| "Table dropped the request".to_string())
    }

    /// Start receiving table events for a connection
    pub async fn subscribe(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::Sender<TableEvent>,
    ) -> Result<(), String> {
        self.send(TableMessage::Subscribe {
            connection_id,
            sender,
        })
        .await
    }

    pub async fn unsubscribe(&self, connection_id: ConnectionId) -> Result<(), String> {
        self.send(TableMessage::Unsubscribe { connection_id }).await
    }

    /// Ask the table to shut down
    pub async fn close(&self) -> Result<TableResponse, String> {
        let (tx, rx) = oneshot::channel();
        self.send(TableMessage::Close { response: tx }).await?;
        rx.await.map_err(|_| "Table dropped the request".to_string())
    }

    /// Check whether the actor has stopped
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Table actor owning a single blackjack table.
///
/// Messages are handled one at a time, so every command is atomic with
/// respect to every other command on the same table.
pub struct TableActor {
    /// Table ID
    id: TableId,

    /// Table configuration
    config: TableConfig,

    /// Round state machine
    table: Table,

    /// Message inbox
    inbox: mpsc::Receiver<TableMessage>,

    /// Connections receiving table events
    notifier: SubscriberNotifier,

    /// Is table closed
    is_closed: bool,
}

impl TableActor {
    /// Create a new table actor
    ///
    /// # Arguments
    ///
    /// * `id` - Table ID
    /// * `config` - Table configuration
    ///
    /// # Returns
    ///
    /// * `(TableActor, TableHandle)` - Actor and handle for sending messages
    pub fn new(id: TableId, config: TableConfig) -> (Self, TableHandle) {
        let table = Table::new(config.game_settings());
        Self::with_table(id, config, table)
    }

    /// Create an actor around an existing table
    pub fn with_table(id: TableId, config: TableConfig, table: Table) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(100);
        let handle = TableHandle::new(sender, id, config.subscriber_buffer);

        let actor = Self {
            id,
            config,
            table,
            inbox,
            notifier: SubscriberNotifier::new(),
            is_closed: false,
        };

        (actor, handle)
    }

    /// Run the table actor event loop
    pub async fn run(mut self) {
        log::info!("Table {} '{}' starting", self.id, self.config.name);

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);

            if self.is_closed {
                break;
            }
        }

        log::info!(
            "Table {} '{}' closed after {} round(s)",
            self.id,
            self.config.name,
            self.table.rounds_played()
        );
    }

    /// Handle a table message
    fn handle_message(&mut self, message: TableMessage) {
        match message {
            TableMessage::Command {
                connection_id,
                command,
                response,
            } => {
                let result = self.handle_command(connection_id, command);
                let _ = response.send(result);
            }

            TableMessage::GetState { response } => {
                let _ = response.send(self.get_state());
            }

            TableMessage::Subscribe {
                connection_id,
                sender,
            } => {
                self.notifier.subscribe(connection_id, sender);
                log::debug!(
                    "Connection {} subscribed to table {}",
                    connection_id,
                    self.id
                );

                // Bring the new subscriber up to date
                self.notifier.send_to_one(
                    &connection_id,
                    &TableEvent::UpdatePlayers(self.table.player_views()),
                );
                self.notifier.send_to_one(
                    &connection_id,
                    &TableEvent::UpdateDealer(self.table.dealer_view()),
                );
            }

            TableMessage::Unsubscribe { connection_id } => {
                if self.notifier.unsubscribe(&connection_id) {
                    log::debug!(
                        "Connection {} unsubscribed from table {}",
                        connection_id,
                        self.id
                    );
                }
            }

            TableMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(TableResponse::Success);
            }
        }
    }

    /// Apply a command and fan out whatever it produced
    fn handle_command(&mut self, connection_id: ConnectionId, command: Command) -> TableResponse {
        log::debug!("Table {}: {} {}", self.id, connection_id, command);

        self.table
            .apply(connection_id, command)
            .map(|outbox| self.notifier.dispatch(outbox))
            .into()
    }

    /// Get current table state
    fn get_state(&self) -> TableStateResponse {
        TableStateResponse {
            table_id: self.id,
            table_name: self.config.name.clone(),
            phase: self.table.phase(),
            player_count: self.table.players().len(),
            max_players: self.config.max_players,
            players: self.table.player_views(),
            dealer: self.table.dealer_view(),
            rounds_played: self.table.rounds_played(),
            subscriber_count: self.notifier.len(),
        }
    }
}
