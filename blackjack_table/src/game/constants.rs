//! Table and rule constants.

use super::entities::Usd;

/// Best possible hand score. Anything above busts.
pub const BLACKJACK: u32 = 21;

/// The dealer keeps drawing while their score is below this value.
pub const DEALER_STANDS_ON: u32 = 17;

/// A single standard deck.
pub const DECK_SIZE: usize = 52;

/// Balance every player starts with when they join.
pub const DEFAULT_STARTING_BALANCE: Usd = 1000;

/// Seats at a table. Seven players drawing from one deck can still
/// exhaust it in a long round, which is handled by aborting that round.
pub const MAX_PLAYERS: usize = 7;

/// Display names are truncated to this many characters.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 32;

pub const INITIAL_PLAYER_CARDS: usize = 2;

/// Only one dealer card is dealt before the dealer's turn. There's no
/// face-down hole card.
pub const INITIAL_DEALER_CARDS: usize = 1;
