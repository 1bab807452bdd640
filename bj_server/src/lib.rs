//! Blackjack server library: HTTP/WebSocket gateway over table actors.
//!
//! The binary in `main.rs` wires these modules together; they're exposed
//! here so integration tests can build the same router.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
