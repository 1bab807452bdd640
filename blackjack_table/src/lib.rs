//! # Blackjack Table
//!
//! A multiplayer blackjack table coordinator. Players join a shared table,
//! bet, draw or stand, and play against a dealer who draws to 17.
//!
//! ## Round lifecycle
//!
//! - **WaitingForPlayers**: No one is seated
//! - **Betting**: Seated players escrow a bet; the round starts once all have
//! - **DealingInitial**: Two cards to each player, one to the dealer
//! - **PlayerTurns**: Players draw or stand; a bust forces a stand
//! - **DealerTurn**: The dealer draws while below 17
//! - **Resolution**: Payouts, per-player results, reset to Betting
//!
//! ## Core Modules
//!
//! - [`game`]: Cards, hand evaluation, and the round state machine
//! - [`table`]: Actor that owns a table and fans out its events
//! - [`net`]: JSON wire protocol
//!
//! ## Example
//!
//! ```
//! use blackjack_table::{Command, Table, RoundPhase, entities::ConnectionId};
//!
//! let mut table = Table::default();
//! let alice = ConnectionId::new();
//! table.apply(alice, Command::Join { name: "alice".into() }).unwrap();
//! assert_eq!(table.phase(), RoundPhase::Betting);
//! ```

/// Wire protocol for client-server communication.
pub mod net;
pub use net::{messages, utils};

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    Command, GameSettings, Outbound, Recipient, RoundPhase, Table, TableError, TableEvent,
    constants::{self, DEFAULT_STARTING_BALANCE, MAX_PLAYERS},
    entities, functional,
};

/// Async table actors and the table registry.
pub mod table;
