// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Texas Hold'em hand engine.
use ahash::AHashMap;
use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    betting::BettingState,
    error::EngineError,
    evaluator::{Comparison, Evaluator, HandEvaluator},
    game_state::{AiState, GameStatePublic},
    message::{Action, ActionKind, EventKind, EventMessage, Winner},
    poker::{Card, Chips, Deck, PlayerId, Street},
};

/// The default human player seat.
pub const HUMAN_PLAYER_ID: &str = "p1";

/// The default number of history entries in the public state.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// The minimum number of seats.
pub const MIN_SEATS: usize = 2;

/// The maximum number of seats.
pub const MAX_SEATS: usize = 5;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// The seats in table order.
    pub players: Vec<PlayerId>,
    /// The seat played by a human, the other seats are automated.
    pub human_player: PlayerId,
    /// The chips each player starts with.
    pub starting_stack: Chips,
    /// The small blind.
    pub small_blind: Chips,
    /// The big blind.
    pub big_blind: Chips,
}

impl EngineConfig {
    /// A configuration with `n` seats named `p1` to `pn`.
    pub fn with_seats(n: usize) -> Self {
        Self {
            players: (1..=n).map(|i| PlayerId::new(format!("p{i}"))).collect(),
            ..Self::default()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            players: ["p1", "p2", "p3", "p4", "p5"].map(PlayerId::from).to_vec(),
            human_player: PlayerId::from(HUMAN_PLAYER_ID),
            starting_stack: Chips::new(1000),
            small_blind: Chips::new(5),
            big_blind: Chips::new(10),
        }
    }
}

/// Runs hands for a fixed set of seats, stacks carry over between hands.
///
/// The engine is not synchronized, callers must serialize calls that mutate
/// the same engine.
#[derive(Debug)]
pub struct Engine<E = Evaluator> {
    players: Vec<PlayerId>,
    human_player: PlayerId,
    deck: Deck,
    board: Vec<Card>,
    hole_cards: AHashMap<PlayerId, [Card; 2]>,
    street: Street,
    betting: BettingState,
    button: usize,
    in_hand: bool,
    evaluator: E,
    events: Vec<EventMessage>,
}

impl Engine {
    /// Creates an engine that uses the default hand evaluator.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_evaluator(config, Evaluator)
    }
}

impl<E: HandEvaluator> Engine<E> {
    /// Creates an engine with a custom hand evaluator.
    pub fn with_evaluator(config: EngineConfig, evaluator: E) -> Self {
        let betting = BettingState::new(
            &config.players,
            config.starting_stack,
            config.small_blind,
            config.big_blind,
        );

        Self {
            players: config.players,
            human_player: config.human_player,
            deck: Deck::default(),
            board: Vec::default(),
            hole_cards: AHashMap::default(),
            street: Street::Preflop,
            betting,
            button: 0,
            in_hand: false,
            evaluator,
            events: Vec::default(),
        }
    }

    /// Starts a new hand.
    ///
    /// The deck is shuffled with `seed` if given or with an OS seeded
    /// generator. Players with no chips sit out the hand, on error the engine
    /// is left unchanged.
    pub fn new_hand(&mut self, seed: Option<u64>, rotate_button: bool) -> Result<(), EngineError> {
        let n = self.players.len();
        if !(MIN_SEATS..=MAX_SEATS).contains(&n) {
            return Err(EngineError::InvalidSeatCount(n));
        }

        // Bets of an unpaid hand go back to the players before picking who
        // plays the next hand.
        let mut betting = self.betting.clone();
        betting.refund_unpaid();

        let with_chips = self
            .players
            .iter()
            .filter(|p| has_chips(&betting, p))
            .count();
        if with_chips < 2 {
            return Err(EngineError::NotEnoughPlayers);
        }

        let from = if rotate_button { self.button + 1 } else { self.button };
        let button = self.next_with_chips(&betting, from)?;

        // Heads up the button posts the small blind and acts first preflop.
        let heads_up = with_chips == 2;
        let sb = if heads_up {
            button
        } else {
            self.next_with_chips(&betting, button + 1)?
        };
        let bb = self.next_with_chips(&betting, sb + 1)?;
        let first = if heads_up {
            sb
        } else {
            self.next_with_chips(&betting, bb + 1)?
        };

        betting.start_hand(
            &self.players,
            &self.players[sb],
            &self.players[bb],
            &self.players[first],
        )?;

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        // Every seat in the hand gets cards, seats sitting out are folded.
        let mut deck = Deck::shuffled(&mut rng);
        let mut hole_cards = AHashMap::with_capacity(n);
        for seat in betting.seats().iter().filter(|s| !s.is_folded) {
            let cards = deck.deal(2)?;
            hole_cards.insert(seat.player_id.clone(), [cards[0], cards[1]]);
        }

        info!(
            "New hand button: {} sb: {} bb: {} seed: {seed:?}",
            self.players[button], self.players[sb], self.players[bb]
        );

        self.betting = betting;
        self.button = button;
        self.deck = deck;
        self.hole_cards = hole_cards;
        self.board.clear();
        self.street = Street::Preflop;
        self.in_hand = true;

        // Hole cards are private and only visible in the player state.
        self.events
            .push(EventMessage::deal(EventKind::DealHole, self.street, Vec::new()));

        // Blinds may have put all but one player all in.
        if self.betting.current_player().is_none() {
            self.next_street()?;
        }

        Ok(())
    }

    /// Starts the next hand moving the button to the next player.
    pub fn start_next_hand(&mut self, seed: Option<u64>) -> Result<(), EngineError> {
        self.new_hand(seed, true)
    }

    /// Deals the flop, returns the board.
    pub fn deal_flop(&mut self) -> Result<&[Card], EngineError> {
        self.deal_street(Street::Preflop, 3, EventKind::DealFlop)
    }

    /// Deals the turn, returns the board.
    pub fn deal_turn(&mut self) -> Result<&[Card], EngineError> {
        self.deal_street(Street::Flop, 1, EventKind::DealTurn)
    }

    /// Deals the river, returns the board.
    pub fn deal_river(&mut self) -> Result<&[Card], EngineError> {
        self.deal_street(Street::Turn, 1, EventKind::DealRiver)
    }

    /// Applies an action from the player on turn.
    ///
    /// When the betting round closes the engine deals the next street or
    /// resolves the showdown after the river.
    pub fn step(&mut self, action: Action, player: &PlayerId) -> Result<(), EngineError> {
        if !self.in_hand {
            return Err(EngineError::NoHandInProgress);
        }

        let result = self.betting.step(action, player)?;
        if result.hand_over {
            let winner = result.winner.ok_or(EngineError::NoWinners)?;
            self.end_hand_by_fold(winner)
        } else if result.round_complete {
            self.next_street()
        } else {
            Ok(())
        }
    }

    /// Compares the human hand with the first automated player hand.
    ///
    /// This is a read only query, the street doesn't move to showdown.
    pub fn evaluate_showdown(&self) -> Result<Comparison<E::Score>, EngineError> {
        let human = self.hole_cards.get(&self.human_player);
        let ai = self.hole_cards.get(self.first_ai_player());
        let (Some(human), Some(ai)) = (human, ai) else {
            return Err(EngineError::HoleCardsNotDealt);
        };

        if self.board.len() < 5 {
            return Err(EngineError::IncompleteBoard(self.board.len()));
        }

        self.evaluator.compare(human, ai, &self.board)
    }

    /// Returns and clears the queued events in emission order.
    pub fn drain_events(&mut self) -> Vec<EventMessage> {
        std::mem::take(&mut self.events)
    }

    /// The game state as seen by `viewer`, with the last `history_limit`
    /// actions.
    pub fn to_public_state(
        &self,
        viewer: Option<&PlayerId>,
        history_limit: usize,
        session_id: Option<&str>,
    ) -> GameStatePublic {
        let history = self.betting.history();
        let skip = history.len().saturating_sub(history_limit);

        GameStatePublic {
            session_id: session_id.map(ToString::to_string),
            street: self.street,
            pot: self.betting.pot(),
            community_cards: self.board.clone(),
            hand: viewer
                .and_then(|p| self.hole_cards.get(p))
                .map(|cards| cards.to_vec()),
            stacks: self.betting.stacks(),
            bets: self.betting.bets(),
            current_player: self.betting.current_player().cloned(),
            legal_actions: self.betting.legal_actions(),
            action_history: history.skip(skip).cloned().collect(),
        }
    }

    /// The state for an automated player decision.
    ///
    /// When nobody is on turn the deciding player is the first automated seat.
    pub fn to_ai_state(&self) -> AiState {
        let player = self
            .betting
            .current_player()
            .unwrap_or_else(|| self.first_ai_player())
            .clone();

        AiState {
            street: self.street,
            legal_actions: self.betting.legal_actions(),
            min_raise_to: self.betting.min_raise_to(&player),
            max_raise_to: self.betting.max_raise_to(&player),
            to_call: self.betting.to_call(&player),
            stacks: self.betting.stacks(),
            bets: self.betting.bets(),
            current_player: player,
        }
    }

    /// The current street.
    pub fn street(&self) -> Street {
        self.street
    }

    /// The board cards.
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    /// The pot.
    pub fn pot(&self) -> Chips {
        self.betting.pot()
    }

    /// The player on turn.
    pub fn current_player(&self) -> Option<&PlayerId> {
        self.betting.current_player()
    }

    /// The legal actions for the player on turn.
    pub fn legal_actions(&self) -> Vec<ActionKind> {
        self.betting.legal_actions()
    }

    /// A player hole cards.
    pub fn hole_cards(&self, player: &PlayerId) -> Option<&[Card; 2]> {
        self.hole_cards.get(player)
    }

    /// A player stack.
    pub fn stack(&self, player: &PlayerId) -> Option<Chips> {
        self.betting.stack(player)
    }

    /// Checks if the last hand has ended or no hand was started.
    pub fn is_hand_over(&self) -> bool {
        !self.in_hand
    }

    /// The player with the button.
    pub fn button_player(&self) -> Option<&PlayerId> {
        self.players.get(self.button)
    }

    /// The seats in table order.
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// The human seat.
    pub fn human_player(&self) -> &PlayerId {
        &self.human_player
    }

    /// The betting state.
    pub fn betting(&self) -> &BettingState {
        &self.betting
    }

    /// The first seat with chips starting at `from`.
    fn next_with_chips(&self, betting: &BettingState, from: usize) -> Result<usize, EngineError> {
        let n = self.players.len();
        (0..n)
            .map(|offset| (from + offset) % n)
            .find(|&idx| has_chips(betting, &self.players[idx]))
            .ok_or(EngineError::NotEnoughPlayers)
    }

    fn first_ai_player(&self) -> &PlayerId {
        self.players
            .iter()
            .find(|p| **p != self.human_player)
            .unwrap_or(&self.human_player)
    }

    /// The first seat after the button that can act.
    fn first_to_act_postflop(&self) -> PlayerId {
        let n = self.players.len();
        let start = self.button + 1;
        (0..n)
            .map(|offset| &self.players[(start + offset) % n])
            .find(|p| self.betting.can_act(p))
            .unwrap_or(&self.players[start % n])
            .clone()
    }

    fn deal_street(
        &mut self,
        from: Street,
        count: usize,
        event: EventKind,
    ) -> Result<&[Card], EngineError> {
        let next = match from {
            Street::Preflop => Street::Flop,
            Street::Flop => Street::Turn,
            _ => Street::River,
        };

        if !self.in_hand || self.street != from {
            return Err(EngineError::InvalidStreet(next));
        }

        let cards = self.deck.deal(count)?;
        self.board.extend_from_slice(&cards);
        self.street = next;

        debug!("Deal {next} {cards:?}");
        self.events.push(EventMessage::deal(event, next, cards));

        Ok(&self.board)
    }

    /// Deals streets until there is a player on turn or the hand is over.
    fn next_street(&mut self) -> Result<(), EngineError> {
        loop {
            match self.street {
                Street::Preflop => {
                    self.deal_flop()?;
                }
                Street::Flop => {
                    self.deal_turn()?;
                }
                Street::Turn => {
                    self.deal_river()?;
                }
                Street::River => return self.resolve_showdown(),
                Street::Showdown => return Ok(()),
            }

            let first = self.first_to_act_postflop();
            self.betting.start_new_round(&first)?;
            if self.betting.current_player().is_some() {
                return Ok(());
            }
        }
    }

    fn end_hand_by_fold(&mut self, winner: PlayerId) -> Result<(), EngineError> {
        let pot = self.betting.pot();
        let button = self
            .button_player()
            .cloned()
            .ok_or(EngineError::NoHandInProgress)?;
        self.betting.payout(std::slice::from_ref(&winner), &button)?;

        info!("Player {winner} wins {pot} all others folded");

        self.street = Street::Showdown;
        self.in_hand = false;
        self.events
            .push(EventMessage::hand_end(Some(Winner::Single(winner)), None, pot));

        Ok(())
    }

    fn resolve_showdown(&mut self) -> Result<(), EngineError> {
        let mut scores = Vec::with_capacity(self.players.len());
        for player in self.betting.active_players() {
            let hole = self
                .hole_cards
                .get(player)
                .ok_or(EngineError::HoleCardsNotDealt)?;
            let score = self.evaluator.evaluate(hole, &self.board)?;
            scores.push((player.clone(), score));
        }

        let best = scores
            .iter()
            .map(|(_, score)| *score)
            .max()
            .ok_or(EngineError::NoWinners)?;
        let winners = scores
            .into_iter()
            .filter(|(_, score)| *score == best)
            .map(|(player, _)| player)
            .collect::<Vec<_>>();

        let pot = self.betting.pot();
        let category = self.evaluator.category(best);
        let button = self
            .button_player()
            .cloned()
            .ok_or(EngineError::NoHandInProgress)?;
        self.betting.payout(&winners, &button)?;

        info!("Showdown {winners:?} win {pot} with {category}");

        let winner = if let [single] = winners.as_slice() {
            Winner::Single(single.clone())
        } else {
            Winner::Split(winners)
        };

        self.street = Street::Showdown;
        self.in_hand = false;
        self.events
            .push(EventMessage::hand_end(Some(winner), Some(category), pot));

        Ok(())
    }
}

fn has_chips(betting: &BettingState, player: &PlayerId) -> bool {
    betting
        .stack(player)
        .is_some_and(|stack| stack > Chips::ZERO)
}
