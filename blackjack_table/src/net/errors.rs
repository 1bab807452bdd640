//! Protocol error types for decoding client messages.

use thiserror::Error;

/// Errors that can occur while reading a client message
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Message wasn't a known event
    #[error("Failed to decode message: {0}")]
    Decode(#[from] serde_json::Error),

    /// Message size exceeded maximum allowed
    #[error("Message size {actual} exceeds maximum {max}")]
    MessageTooLarge { actual: usize, max: usize },
}

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
