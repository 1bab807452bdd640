//! Blackjack round state machine.
//!
//! A [`Table`] owns every player, the dealer, and the deck. All mutation goes
//! through [`Table::apply`], which either applies a [`Command`] completely and
//! returns the events it produced, or rejects it and leaves the table as it was.
//! Automatic phases (dealing, the dealer's turn, resolution) run inside the
//! same call that triggers them.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::constants::{
    DEFAULT_STARTING_BALANCE, INITIAL_DEALER_CARDS, INITIAL_PLAYER_CARDS, MAX_PLAYERS,
};
use super::entities::{
    ConnectionId, Dealer, DealerView, Deck, DisplayName, Player, PlayerView, RoundOutcome, Usd,
};
use super::functional;

/// Errors that can occur while applying a command
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum TableError {
    #[error("already joined")]
    AlreadyJoined,
    #[error("already standing")]
    AlreadyStanding,
    #[error("bet already placed this round")]
    BetAlreadyPlaced,
    #[error("deck exhausted")]
    DeckExhausted,
    #[error("need ${required}, have ${available}")]
    InsufficientFunds { required: i64, available: Usd },
    #[error("not allowed while {phase}")]
    InvalidAction { phase: RoundPhase },
    #[error("illegal bet of ${0}")]
    InvalidBetAmount(i64),
    #[error("display name can't be empty")]
    InvalidDisplayName,
    #[error("round in progress, wait for the next round")]
    RoundInProgress,
    #[error("table is full")]
    TableFull,
    #[error("not at the table")]
    UnknownPlayer,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundPhase {
    WaitingForPlayers,
    Betting,
    DealingInitial,
    PlayerTurns,
    DealerTurn,
    Resolution,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::WaitingForPlayers => "waiting for players",
            Self::Betting => "betting",
            Self::DealingInitial => "dealing",
            Self::PlayerTurns => "players' turns",
            Self::DealerTurn => "dealer's turn",
            Self::Resolution => "resolving",
        };
        write!(f, "{repr}")
    }
}

/// Everything a connection can ask a table to do.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Command {
    Join { name: String },
    Bet { amount: i64 },
    Draw,
    Stand,
    Leave,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Join { name } => write!(f, "joins as {name:?}"),
            Self::Bet { amount } => write!(f, "bets ${amount}"),
            Self::Draw => write!(f, "draws"),
            Self::Stand => write!(f, "stands"),
            Self::Leave => write!(f, "leaves"),
        }
    }
}

/// Events pushed out to participants. The serialized form is the wire
/// protocol: `{"event": "updatePlayers", "data": [...]}`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum TableEvent {
    UpdatePlayers(Vec<PlayerView>),
    StartGame {
        dealer: DealerView,
        players: Vec<PlayerView>,
    },
    UpdateDealer(DealerView),
    GameResult(String),
    RoundAborted(String),
    ActionRejected(String),
}

impl TableEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdatePlayers(_) => "updatePlayers",
            Self::StartGame { .. } => "startGame",
            Self::UpdateDealer(_) => "updateDealer",
            Self::GameResult(_) => "gameResult",
            Self::RoundAborted(_) => "roundAborted",
            Self::ActionRejected(_) => "actionRejected",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Recipient {
    All,
    One(ConnectionId),
}

/// An event and who should receive it.
#[derive(Clone, Debug, PartialEq)]
pub struct Outbound {
    pub recipient: Recipient,
    pub event: TableEvent,
}

impl Outbound {
    #[must_use]
    pub fn broadcast(event: TableEvent) -> Self {
        Self {
            recipient: Recipient::All,
            event,
        }
    }

    #[must_use]
    pub fn direct(id: ConnectionId, event: TableEvent) -> Self {
        Self {
            recipient: Recipient::One(id),
            event,
        }
    }
}

/// Game configuration settings
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameSettings {
    pub starting_balance: Usd,
    pub max_players: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_BALANCE, MAX_PLAYERS)
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(starting_balance: Usd, max_players: usize) -> Self {
        Self {
            starting_balance,
            max_players,
        }
    }
}

/// A blackjack table: players in join order, the dealer, the deck, and the
/// phase of the current round.
#[derive(Debug)]
pub struct Table {
    players: Vec<Player>,
    dealer: Dealer,
    /// Reset at the end of every round so each round draws from a fresh,
    /// reshuffled deck.
    deck: Deck,
    phase: RoundPhase,
    settings: GameSettings,
    rounds_played: u64,
}

impl Default for Table {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}

impl Table {
    #[must_use]
    pub fn new(settings: GameSettings) -> Self {
        Self::with_deck(settings, Deck::new())
    }

    /// A table whose first round draws from `deck`. Later rounds use
    /// freshly shuffled decks.
    #[must_use]
    pub fn with_deck(settings: GameSettings, deck: Deck) -> Self {
        Self {
            players: Vec::with_capacity(settings.max_players),
            dealer: Dealer::default(),
            deck,
            phase: RoundPhase::WaitingForPlayers,
            settings,
            rounds_played: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: &ConnectionId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == *id)
    }

    #[must_use]
    pub fn dealer(&self) -> &Dealer {
        &self.dealer
    }

    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn player_views(&self) -> Vec<PlayerView> {
        self.players.iter().map(Player::view).collect()
    }

    #[must_use]
    pub fn dealer_view(&self) -> DealerView {
        self.dealer.view()
    }

    /// Apply one command on behalf of `id`.
    ///
    /// Rejections leave the table untouched and produce no events. Running
    /// out of cards isn't a rejection: the round is voided, bets are
    /// refunded, and the abort is broadcast.
    pub fn apply(
        &mut self,
        id: ConnectionId,
        command: Command,
    ) -> Result<Vec<Outbound>, TableError> {
        let mut outbox = Vec::new();
        let result = match command {
            Command::Join { name } => self.join(id, &name, &mut outbox),
            Command::Bet { amount } => self.place_bet(id, amount, &mut outbox),
            Command::Draw => self.draw_card(id, &mut outbox),
            Command::Stand => self.stand(id, &mut outbox),
            Command::Leave => self.leave(id, &mut outbox),
        };

        match result {
            Ok(()) => Ok(outbox),
            Err(TableError::DeckExhausted) => {
                warn!("Deck exhausted while {}, aborting round", self.phase);
                self.abort_round(
                    "The deck ran out of cards. Open bets have been returned.",
                    &mut outbox,
                );
                Ok(outbox)
            }
            Err(error) => {
                debug!("Rejected command from {id}: {error}");
                Err(error)
            }
        }
    }

    fn join(
        &mut self,
        id: ConnectionId,
        name: &str,
        outbox: &mut Vec<Outbound>,
    ) -> Result<(), TableError> {
        if !matches!(
            self.phase,
            RoundPhase::WaitingForPlayers | RoundPhase::Betting
        ) {
            return Err(TableError::RoundInProgress);
        }
        if self.player(&id).is_some() {
            return Err(TableError::AlreadyJoined);
        }
        if self.players.len() >= self.settings.max_players {
            return Err(TableError::TableFull);
        }
        let name = DisplayName::new(name);
        if name.is_empty() {
            return Err(TableError::InvalidDisplayName);
        }

        info!("{name} ({id}) joined the table");
        self.players
            .push(Player::new(id, name, self.settings.starting_balance));
        if self.phase == RoundPhase::WaitingForPlayers {
            self.set_phase(RoundPhase::Betting);
        }
        outbox.push(self.update_players());
        Ok(())
    }

    fn place_bet(
        &mut self,
        id: ConnectionId,
        amount: i64,
        outbox: &mut Vec<Outbound>,
    ) -> Result<(), TableError> {
        let idx = self.player_index(&id)?;
        self.require_phase(RoundPhase::Betting)?;

        let player = &mut self.players[idx];
        if player.has_bet() {
            return Err(TableError::BetAlreadyPlaced);
        }
        if amount <= 0 {
            return Err(TableError::InvalidBetAmount(amount));
        }
        let Ok(bet) = Usd::try_from(amount) else {
            return Err(TableError::InsufficientFunds {
                required: amount,
                available: player.balance,
            });
        };
        if bet > player.balance {
            return Err(TableError::InsufficientFunds {
                required: amount,
                available: player.balance,
            });
        }

        player.balance -= bet;
        player.bet = bet;
        info!("{} bet ${bet}", player.name);
        outbox.push(self.update_players());

        if self.all_bet() {
            self.deal_initial_hands(outbox)?;
        }
        Ok(())
    }

    fn draw_card(&mut self, id: ConnectionId, outbox: &mut Vec<Outbound>) -> Result<(), TableError> {
        let idx = self.player_index(&id)?;
        self.require_phase(RoundPhase::PlayerTurns)?;
        if self.players[idx].is_standing {
            return Err(TableError::AlreadyStanding);
        }

        let card = self.deck.draw()?;
        let player = &mut self.players[idx];
        player.hand.push(card);
        debug!("{} drew {card}", player.name);

        let busted = player.hand.is_bust();
        if busted {
            info!("{} busted with {}", player.name, player.hand.score());
            player.is_standing = true;
            player.result_sent = true;
        }
        outbox.push(self.update_players());
        if busted {
            outbox.push(Outbound::direct(
                id,
                TableEvent::GameResult(RoundOutcome::Bust.message().to_string()),
            ));
        }

        self.advance_if_all_standing(outbox)
    }

    fn stand(&mut self, id: ConnectionId, outbox: &mut Vec<Outbound>) -> Result<(), TableError> {
        let idx = self.player_index(&id)?;
        self.require_phase(RoundPhase::PlayerTurns)?;
        let player = &mut self.players[idx];
        if player.is_standing {
            return Err(TableError::AlreadyStanding);
        }

        player.is_standing = true;
        debug!("{} stands on {}", player.name, player.hand.score());
        outbox.push(self.update_players());

        self.advance_if_all_standing(outbox)
    }

    /// Leaving is valid in every phase. The remaining players may now all
    /// have bet or all be standing, so the round is re-evaluated.
    fn leave(&mut self, id: ConnectionId, outbox: &mut Vec<Outbound>) -> Result<(), TableError> {
        let idx = self.player_index(&id)?;
        let player = self.players.remove(idx);
        info!(
            "{} ({id}) left the table with ${} (forfeiting ${})",
            player.name, player.balance, player.bet
        );
        outbox.push(self.update_players());

        if self.players.is_empty() {
            if self.phase != RoundPhase::WaitingForPlayers {
                let dealt = !self.dealer.hand.is_empty();
                self.reset_round();
                if dealt {
                    outbox.push(self.update_dealer());
                }
            }
            return Ok(());
        }

        match self.phase {
            RoundPhase::Betting if self.all_bet() => self.deal_initial_hands(outbox),
            RoundPhase::PlayerTurns => self.advance_if_all_standing(outbox),
            _ => Ok(()),
        }
    }

    fn deal_initial_hands(&mut self, outbox: &mut Vec<Outbound>) -> Result<(), TableError> {
        self.set_phase(RoundPhase::DealingInitial);
        for _ in 0..INITIAL_PLAYER_CARDS {
            for player in &mut self.players {
                player.hand.push(self.deck.draw()?);
            }
        }
        for _ in 0..INITIAL_DEALER_CARDS {
            self.dealer.hand.push(self.deck.draw()?);
        }

        info!(
            "Round {} started with {} player(s)",
            self.rounds_played + 1,
            self.players.len()
        );
        outbox.push(Outbound::broadcast(TableEvent::StartGame {
            dealer: self.dealer_view(),
            players: self.player_views(),
        }));
        self.set_phase(RoundPhase::PlayerTurns);
        Ok(())
    }

    fn advance_if_all_standing(&mut self, outbox: &mut Vec<Outbound>) -> Result<(), TableError> {
        if self.phase != RoundPhase::PlayerTurns || !self.all_standing() {
            return Ok(());
        }
        self.play_dealer_turn(outbox)?;
        self.resolve_round(outbox);
        Ok(())
    }

    fn play_dealer_turn(&mut self, outbox: &mut Vec<Outbound>) -> Result<(), TableError> {
        self.set_phase(RoundPhase::DealerTurn);
        while functional::dealer_should_draw(self.dealer.hand.cards()) {
            self.dealer.hand.push(self.deck.draw()?);
        }
        info!("Dealer finished with {}", self.dealer.hand.score());
        outbox.push(self.update_dealer());
        Ok(())
    }

    /// Pays out every player who hasn't busted, notifies each player of
    /// their result, then clears the table for the next round.
    fn resolve_round(&mut self, outbox: &mut Vec<Outbound>) {
        self.set_phase(RoundPhase::Resolution);
        let dealer_score = self.dealer.hand.score();

        for player in &mut self.players {
            if player.result_sent {
                continue;
            }
            let outcome = functional::settle(player.hand.score(), dealer_score);
            player.balance = player.balance.saturating_add(outcome.payout(player.bet));
            player.result_sent = true;
            debug!("{}: {outcome} (balance ${})", player.name, player.balance);
            outbox.push(Outbound::direct(
                player.id,
                TableEvent::GameResult(outcome.message().to_string()),
            ));
        }

        self.rounds_played += 1;
        self.reset_round();
        outbox.push(self.update_players());
        outbox.push(self.update_dealer());
    }

    /// Voids the current round. Escrowed bets go back to their owners,
    /// except for players already told they lost.
    fn abort_round(&mut self, reason: &str, outbox: &mut Vec<Outbound>) {
        for player in self.players.iter_mut().filter(|p| !p.result_sent) {
            player.balance = player.balance.saturating_add(player.bet);
        }
        self.reset_round();
        outbox.push(Outbound::broadcast(TableEvent::RoundAborted(
            reason.to_string(),
        )));
        outbox.push(self.update_players());
        outbox.push(self.update_dealer());
    }

    fn reset_round(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
        self.dealer.reset();
        self.deck.reset();
        self.set_phase(if self.players.is_empty() {
            RoundPhase::WaitingForPlayers
        } else {
            RoundPhase::Betting
        });
    }

    fn set_phase(&mut self, phase: RoundPhase) {
        if self.phase != phase {
            debug!("Phase {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn require_phase(&self, phase: RoundPhase) -> Result<(), TableError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(TableError::InvalidAction { phase: self.phase })
        }
    }

    fn player_index(&self, id: &ConnectionId) -> Result<usize, TableError> {
        self.players
            .iter()
            .position(|p| p.id == *id)
            .ok_or(TableError::UnknownPlayer)
    }

    fn all_bet(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(Player::has_bet)
    }

    fn all_standing(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.is_standing)
    }

    fn update_players(&self) -> Outbound {
        Outbound::broadcast(TableEvent::UpdatePlayers(self.player_views()))
    }

    fn update_dealer(&self) -> Outbound {
        Outbound::broadcast(TableEvent::UpdateDealer(self.dealer_view()))
    }
}
