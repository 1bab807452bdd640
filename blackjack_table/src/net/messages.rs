use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::Command;

/// A message from a blackjack client to the table it's connected to.
///
/// Adjacently tagged, matching outbound events:
/// `{"event": "placeBet", "data": 50}`. Disconnecting isn't a message;
/// closing the socket is what removes a player.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Take a seat under the given display name.
    JoinGame(String),
    /// Escrow a bet for the coming round. Signed so that negative amounts
    /// reach the table and are rejected there instead of failing to parse.
    PlaceBet(i64),
    /// Draw one card.
    DealCard,
    /// End this round's turn.
    Stand,
}

impl ClientMessage {
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::JoinGame(_) => "joinGame",
            Self::PlaceBet(_) => "placeBet",
            Self::DealCard => "dealCard",
            Self::Stand => "stand",
        }
    }
}

impl From<ClientMessage> for Command {
    fn from(value: ClientMessage) -> Self {
        match value {
            ClientMessage::JoinGame(name) => Command::Join { name },
            ClientMessage::PlaceBet(amount) => Command::Bet { amount },
            ClientMessage::DealCard => Command::Draw,
            ClientMessage::Stand => Command::Stand,
        }
    }
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::JoinGame(name) => write!(f, "joinGame({name:?})"),
            Self::PlaceBet(amount) => write!(f, "placeBet({amount})"),
            Self::DealCard => write!(f, "dealCard()"),
            Self::Stand => write!(f, "stand()"),
        }
    }
}
