//! Blackjack game engine: cards, scoring, and the round state machine.
//!
//! This module provides:
//! - Cards, the deck, hands, players, and the snapshot views sent to clients
//! - The hand evaluator (variable-value aces)
//! - The [`Table`] state machine that every player action goes through

pub mod constants;
pub mod entities;
pub mod functional;
pub mod state_machine;

pub use state_machine::{
    Command, GameSettings, Outbound, Recipient, RoundPhase, Table, TableError, TableEvent,
};
