//! Pure scoring functions.

use super::{
    constants::{BLACKJACK, DEALER_STANDS_ON},
    entities::{Card, RoundOutcome},
};

/// Best score of a hand. Every ace starts at 11 and is demoted to 1, one
/// at a time, while the total is above 21.
///
/// ```
/// use blackjack_table::game::{entities::{Card, Suit}, functional::score};
///
/// let hand = [Card(1, Suit::Spade), Card(1, Suit::Heart), Card(9, Suit::Club)];
/// assert_eq!(score(&hand), 21);
/// ```
#[must_use]
pub fn score(cards: &[Card]) -> u32 {
    let mut total = 0;
    let mut soft_aces = 0;
    for card in cards {
        total += card.points();
        if card.is_ace() {
            soft_aces += 1;
        }
    }

    while total > BLACKJACK && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    total
}

#[must_use]
pub fn is_bust(cards: &[Card]) -> bool {
    score(cards) > BLACKJACK
}

/// Dealer stands on every 17, soft or hard.
#[must_use]
pub fn dealer_should_draw(cards: &[Card]) -> bool {
    score(cards) < DEALER_STANDS_ON
}

/// Settle one player's score against the dealer's final score.
#[must_use]
pub fn settle(player_score: u32, dealer_score: u32) -> RoundOutcome {
    if player_score > BLACKJACK {
        RoundOutcome::Bust
    } else if dealer_score > BLACKJACK || player_score > dealer_score {
        RoundOutcome::Win
    } else if player_score == dealer_score {
        RoundOutcome::Push
    } else {
        RoundOutcome::Loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Suit;

    fn cards(values: &[u8]) -> Vec<Card> {
        values.iter().map(|&v| Card(v, Suit::Heart)).collect()
    }

    #[test]
    fn test_empty_hand_scores_zero() {
        assert_eq!(score(&[]), 0);
    }

    #[test]
    fn test_two_aces_and_nine() {
        assert_eq!(score(&cards(&[1, 1, 9])), 21);
    }

    #[test]
    fn test_face_cards() {
        assert_eq!(score(&cards(&[13, 12])), 20);
        assert_eq!(score(&cards(&[13, 12, 5])), 25);
        assert!(is_bust(&cards(&[13, 12, 5])));
    }

    #[test]
    fn test_ace_demoted_only_when_needed() {
        assert_eq!(score(&cards(&[1, 6])), 17);
        assert_eq!(score(&cards(&[1, 6, 10])), 17);
        assert_eq!(score(&cards(&[1, 13])), 21);
        assert_eq!(score(&cards(&[1, 1, 1, 1])), 14);
    }

    #[test]
    fn test_dealer_threshold() {
        assert!(dealer_should_draw(&cards(&[10, 6])));
        assert!(!dealer_should_draw(&cards(&[10, 7])));
        // Soft 17 stands as well
        assert!(!dealer_should_draw(&cards(&[1, 6])));
    }

    #[test]
    fn test_settle() {
        assert_eq!(settle(22, 18), RoundOutcome::Bust);
        assert_eq!(settle(22, 23), RoundOutcome::Bust);
        assert_eq!(settle(15, 23), RoundOutcome::Win);
        assert_eq!(settle(20, 19), RoundOutcome::Win);
        assert_eq!(settle(19, 19), RoundOutcome::Push);
        assert_eq!(settle(18, 20), RoundOutcome::Loss);
    }
}
