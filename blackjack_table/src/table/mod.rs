//! Table module providing multi-table support with async actor model.
//!
//! This module implements:
//! - TableActor: Async actor owning a single blackjack table
//! - TableManager: Registry of running tables
//! - Notifier: Fan-out of table events to subscribed connections
//!
//! ## Architecture
//!
//! Each table runs in a separate Tokio task with an mpsc message inbox.
//! Commands are applied one at a time, so concurrent bets, draws, and
//! disconnects on the same table never interleave. Connections subscribe
//! with their own bounded channel and receive every event the table emits.
//!
//! ## Example
//!
//! ```
//! use blackjack_table::game::{Command, entities::ConnectionId};
//! use blackjack_table::table::{TableActor, TableConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (actor, handle) = TableActor::new(1, TableConfig::default());
//! tokio::spawn(actor.run());
//!
//! let response = handle
//!     .command(ConnectionId::new(), Command::Join { name: "alice".into() })
//!     .await
//!     .unwrap();
//! assert!(response.is_success());
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod manager;
pub mod messages;
pub mod notifier;

/// Table identifier assigned by the [`TableManager`]
pub type TableId = i64;

pub use actor::{TableActor, TableHandle};
pub use config::TableConfig;
pub use manager::{TableManager, TableMetadata};
pub use messages::{TableMessage, TableResponse, TableStateResponse};
pub use notifier::{Notifier, SubscriberNotifier};
