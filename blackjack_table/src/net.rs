//! Wire protocol between browser clients and a table.
//!
//! Messages in both directions are JSON objects of the form
//! `{"event": <name>, "data": <payload>}`. Outbound events are
//! [`TableEvent`](crate::game::TableEvent)s; inbound ones are
//! [`ClientMessage`](messages::ClientMessage)s.

/// Errors raised while decoding client messages.
pub mod errors;

/// Message types sent by clients.
pub mod messages;

/// Helpers for encoding and decoding text frames.
pub mod utils;
