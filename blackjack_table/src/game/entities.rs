use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{
    constants::{DECK_SIZE, MAX_DISPLAY_NAME_LENGTH},
    functional,
    state_machine::TableError,
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    #[serde(rename = "♠")]
    Spade,
    #[serde(rename = "♣")]
    Club,
    #[serde(rename = "♥")]
    Heart,
    #[serde(rename = "♦")]
    Diamond,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Club, Suit::Heart, Suit::Diamond];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Spade => "♠",
            Self::Club => "♣",
            Self::Heart => "♥",
            Self::Diamond => "♦",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

const VALUE_LABELS: [&str; 13] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
];

/// A card is a tuple of a uInt8 value (ace=1u8 ... king=13u8) and a suit.
///
/// On the wire a card is `{"suit": "♠", "value": "A"}`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(into = "CardRepr", try_from = "CardRepr")]
pub struct Card(pub Value, pub Suit);

impl Card {
    pub const ACE: Value = 1;
    pub const JACK: Value = 11;
    pub const QUEEN: Value = 12;
    pub const KING: Value = 13;

    #[must_use]
    pub fn label(&self) -> &'static str {
        usize::from(self.0)
            .checked_sub(1)
            .and_then(|idx| VALUE_LABELS.get(idx))
            .copied()
            .unwrap_or("?")
    }

    #[must_use]
    pub fn is_ace(&self) -> bool {
        self.0 == Self::ACE
    }

    /// Points before any ace is demoted. Aces count 11, face cards 10.
    #[must_use]
    pub fn points(&self) -> u32 {
        match self.0 {
            Self::ACE => 11,
            Self::JACK..=Self::KING => 10,
            v => u32::from(v),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = format!("{}/{}", self.label(), self.1);
        write!(f, "{repr:>4}")
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct CardRepr {
    suit: Suit,
    value: String,
}

impl From<Card> for CardRepr {
    fn from(card: Card) -> Self {
        Self {
            suit: card.1,
            value: card.label().to_string(),
        }
    }
}

impl TryFrom<CardRepr> for Card {
    type Error = String;

    fn try_from(repr: CardRepr) -> Result<Self, Self::Error> {
        VALUE_LABELS
            .iter()
            .position(|label| *label == repr.value)
            .map(|idx| Card(idx as Value + 1, repr.suit))
            .ok_or_else(|| format!("unknown card value {:?}", repr.value))
    }
}

/// A single 52-card deck. Cards are drawn from the end of the vector.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A freshly shuffled deck.
    #[must_use]
    pub fn new() -> Self {
        let mut deck = Self {
            cards: Vec::with_capacity(DECK_SIZE),
        };
        deck.reset();
        deck
    }

    /// A deck that deals exactly the given cards, first card first.
    pub fn stacked(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut cards: Vec<Card> = cards.into_iter().collect();
        cards.reverse();
        Self { cards }
    }

    /// Repopulate all 52 cards and shuffle them. `SliceRandom::shuffle`
    /// is a Fisher-Yates shuffle, so every ordering is equally likely.
    pub fn reset(&mut self) {
        self.cards.clear();
        for suit in Suit::ALL {
            for value in Card::ACE..=Card::KING {
                self.cards.push(Card(value, suit));
            }
        }
        self.cards.shuffle(&mut rand::rng());
    }

    pub fn draw(&mut self) -> Result<Card, TableError> {
        self.cards.pop().ok_or(TableError::DeckExhausted)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

/// Cards held by a player or the dealer. The score is never stored; it's
/// evaluated from the full hand on every call since ace demotion depends
/// on every card held.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Hand(Vec<Card>);

impl Hand {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, card: Card) {
        self.0.push(card);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        functional::score(&self.0)
    }

    #[must_use]
    pub fn is_bust(&self) -> bool {
        functional::is_bust(&self.0)
    }
}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Self(cards)
    }
}

/// Type alias for whole chips. Balances and bets are never negative.
pub type Usd = u32;

/// Opaque identity of one connection. A player is keyed by the connection
/// they joined from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ConnectionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Trims surrounding whitespace, replaces control characters, and
    /// truncates to [`MAX_DISPLAY_NAME_LENGTH`] characters.
    pub fn new(s: &str) -> Self {
        let name = s
            .trim()
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .take(MAX_DISPLAY_NAME_LENGTH)
            .collect::<String>();
        Self(name.trim_end().to_string())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a single player's round ended.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RoundOutcome {
    Win,
    Push,
    Loss,
    Bust,
}

impl RoundOutcome {
    /// Chips returned to the player's balance. The bet was already taken
    /// out of the balance when it was placed.
    #[must_use]
    pub fn payout(&self, bet: Usd) -> Usd {
        match self {
            Self::Win => bet.saturating_mul(2),
            Self::Push => bet,
            Self::Loss | Self::Bust => 0,
        }
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Win => "You win!",
            Self::Push => "It's a tie!",
            Self::Loss => "You lose.",
            Self::Bust => "Bust! You lose.",
        }
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Win => "win",
            Self::Push => "push",
            Self::Loss => "loss",
            Self::Bust => "bust",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub id: ConnectionId,
    pub name: DisplayName,
    pub hand: Hand,
    pub balance: Usd,
    /// Chips in escrow for the current round.
    pub bet: Usd,
    pub is_standing: bool,
    /// Set once this round's result notice went out, which for a bust
    /// happens before resolution.
    pub(crate) result_sent: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: ConnectionId, name: DisplayName, balance: Usd) -> Self {
        Self {
            id,
            name,
            hand: Hand::new(),
            balance,
            bet: 0,
            is_standing: false,
            result_sent: false,
        }
    }

    #[must_use]
    pub fn has_bet(&self) -> bool {
        self.bet > 0
    }

    pub fn reset(&mut self) {
        self.hand.clear();
        self.bet = 0;
        self.is_standing = false;
        self.result_sent = false;
    }

    #[must_use]
    pub fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id,
            name: self.name.to_string(),
            hand: self.hand.cards().to_vec(),
            score: self.hand.score(),
            balance: self.balance,
            bet: self.bet,
            is_standing: self.is_standing,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Dealer {
    pub hand: Hand,
}

impl Dealer {
    pub fn reset(&mut self) {
        self.hand.clear();
    }

    #[must_use]
    pub fn view(&self) -> DealerView {
        DealerView {
            hand: self.hand.cards().to_vec(),
            score: self.hand.score(),
        }
    }
}

/// Snapshot of a player as every participant sees it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: ConnectionId,
    pub name: String,
    pub hand: Vec<Card>,
    pub score: u32,
    pub balance: Usd,
    pub bet: Usd,
    pub is_standing: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct DealerView {
    pub hand: Vec<Card>,
    pub score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // === Card Tests ===

    #[test]
    fn test_card_points() {
        assert_eq!(Card(Card::ACE, Suit::Spade).points(), 11);
        assert_eq!(Card(7, Suit::Heart).points(), 7);
        assert_eq!(Card(10, Suit::Club).points(), 10);
        for value in [Card::JACK, Card::QUEEN, Card::KING] {
            assert_eq!(Card(value, Suit::Diamond).points(), 10);
        }
    }

    #[test]
    fn test_card_labels() {
        assert_eq!(Card(1, Suit::Spade).label(), "A");
        assert_eq!(Card(10, Suit::Spade).label(), "10");
        assert_eq!(Card(12, Suit::Spade).label(), "Q");
        assert_eq!(Card(0, Suit::Spade).label(), "?");
    }

    #[test]
    fn test_card_wire_format() {
        let card = Card(Card::ACE, Suit::Spade);
        let json = serde_json::to_value(card).unwrap();
        assert_eq!(json, serde_json::json!({"suit": "♠", "value": "A"}));

        let back: Card = serde_json::from_value(json).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn test_card_rejects_unknown_value() {
        let json = serde_json::json!({"suit": "♥", "value": "11"});
        assert!(serde_json::from_value::<Card>(json).is_err());
    }

    // === Deck Tests ===

    #[test]
    fn test_deck_initialization() {
        let deck = Deck::new();
        assert_eq!(deck.len(), DECK_SIZE);
    }

    #[test]
    fn test_deck_reset_yields_unique_cards() {
        let mut deck = Deck::new();
        for _ in 0..10 {
            deck.draw().unwrap();
        }
        deck.reset();
        assert_eq!(deck.len(), DECK_SIZE);

        let mut seen = HashSet::new();
        while let Ok(card) = deck.draw() {
            assert!(seen.insert(card), "{card} drawn twice");
        }
        assert_eq!(seen.len(), DECK_SIZE);
    }

    #[test]
    fn test_deck_draw_exhausted() {
        let mut deck = Deck::stacked([Card(5, Suit::Club)]);
        assert_eq!(deck.draw().unwrap(), Card(5, Suit::Club));
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), Err(TableError::DeckExhausted));
    }

    #[test]
    fn test_stacked_deck_order() {
        let mut deck = Deck::stacked([Card(2, Suit::Club), Card(3, Suit::Heart)]);
        assert_eq!(deck.draw().unwrap(), Card(2, Suit::Club));
        assert_eq!(deck.draw().unwrap(), Card(3, Suit::Heart));
    }

    // === Display Name Tests ===

    #[test]
    fn test_display_name_trimmed_and_truncated() {
        assert_eq!(DisplayName::new("  alice ").as_str(), "alice");
        let long = "x".repeat(MAX_DISPLAY_NAME_LENGTH + 10);
        assert_eq!(
            DisplayName::new(&long).as_str().chars().count(),
            MAX_DISPLAY_NAME_LENGTH
        );
        assert!(DisplayName::new("   ").is_empty());
    }

    // === Outcome Tests ===

    #[test]
    fn test_outcome_payouts() {
        assert_eq!(RoundOutcome::Win.payout(100), 200);
        assert_eq!(RoundOutcome::Push.payout(100), 100);
        assert_eq!(RoundOutcome::Loss.payout(100), 0);
        assert_eq!(RoundOutcome::Bust.payout(100), 0);
    }

    // === Player Tests ===

    #[test]
    fn test_player_reset_keeps_balance() {
        let mut player = Player::new(ConnectionId::new(), DisplayName::new("bob"), 900);
        player.bet = 100;
        player.is_standing = true;
        player.hand.push(Card(9, Suit::Heart));
        player.reset();

        assert!(player.hand.is_empty());
        assert_eq!(player.bet, 0);
        assert!(!player.is_standing);
        assert_eq!(player.balance, 900);
    }

    #[test]
    fn test_player_view_serializes_camel_case() {
        let player = Player::new(ConnectionId::new(), DisplayName::new("carol"), 1000);
        let json = serde_json::to_value(player.view()).unwrap();
        assert_eq!(json["isStanding"], serde_json::json!(false));
        assert_eq!(json["name"], serde_json::json!("carol"));
        assert_eq!(json["score"], serde_json::json!(0));
    }
}
