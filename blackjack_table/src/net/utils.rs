use super::{
    errors::{ProtocolError, Result},
    messages::ClientMessage,
};
use crate::game::TableEvent;

/// Maximum accepted size of one client message, in bytes. Every valid
/// message is far smaller.
pub const MAX_MESSAGE_SIZE: usize = 4096;

/// Parse one text frame from a client.
pub fn decode_client_message(text: &str) -> Result<ClientMessage> {
    if text.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            actual: text.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }
    Ok(serde_json::from_str(text)?)
}

/// Render an event as the text frame sent to clients.
pub fn encode_event(event: &TableEvent) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{Card, DealerView, Suit};

    #[test]
    fn test_decode_valid() {
        let message = decode_client_message(r#"{"event":"placeBet","data":100}"#).unwrap();
        assert_eq!(message, ClientMessage::PlaceBet(100));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_client_message("not json"),
            Err(ProtocolError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_oversized() {
        let name = "x".repeat(MAX_MESSAGE_SIZE);
        let text = format!(r#"{{"event":"joinGame","data":"{name}"}}"#);
        assert!(matches!(
            decode_client_message(&text),
            Err(ProtocolError::MessageTooLarge { max: MAX_MESSAGE_SIZE, .. })
        ));
    }

    #[test]
    fn test_encode_dealer_cards() {
        let event = TableEvent::UpdateDealer(DealerView {
            hand: vec![Card(Card::ACE, Suit::Spade)],
            score: 11,
        });
        assert_eq!(
            encode_event(&event).unwrap(),
            r#"{"event":"updateDealer","data":{"hand":[{"suit":"♠","value":"A"}],"score":11}}"#
        );
    }
}
