// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Betting rounds state machine.
//!
//! The [BettingState] tracks stacks, bets and turn order for all the betting
//! rounds of a hand. The pot is a single pool, players that go all-in stay
//! eligible for the whole pot.
use log::{debug, warn};
use std::collections::{BTreeMap, VecDeque};

use crate::{
    error::EngineError,
    message::{Action, ActionKind, ActionRecord, PlayerAction},
    poker::{Chips, PlayerId},
};

/// A player seat in the betting state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    /// The player id.
    pub player_id: PlayerId,
    /// Chips not in the pot.
    pub stack: Chips,
    /// Contribution to the current round.
    pub bet: Chips,
    /// Contribution to the hand.
    pub total_bet: Chips,
    /// The player folded or is sitting out this hand.
    pub is_folded: bool,
    /// The player has no chips left and is in the hand.
    pub is_all_in: bool,
    /// The player acted since the round start or the last raise.
    pub has_acted: bool,
}

impl Seat {
    fn new(player_id: PlayerId, stack: Chips) -> Self {
        Self {
            player_id,
            stack,
            bet: Chips::ZERO,
            total_bet: Chips::ZERO,
            is_folded: false,
            is_all_in: false,
            has_acted: false,
        }
    }

    /// Checks if this player can still take actions.
    pub fn can_act(&self) -> bool {
        !self.is_folded && !self.is_all_in
    }

    /// Moves chips from the stack so that the round bet reaches `target`,
    /// returns the chips paid.
    fn bet_to(&mut self, target: Chips) -> Chips {
        // Player running out of chips goes all in.
        let paid = (target - self.bet).min(self.stack);
        self.stack -= paid;
        self.bet += paid;
        self.total_bet += paid;

        if self.stack == Chips::ZERO && paid > Chips::ZERO {
            self.is_all_in = true;
        }

        paid
    }
}

/// The result of an accepted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    /// The betting round is closed.
    pub round_complete: bool,
    /// All players but one folded.
    pub hand_over: bool,
    /// The only player left when the hand is over.
    pub winner: Option<PlayerId>,
}

/// Stacks, bets and turn order for a hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BettingState {
    seats: Vec<Seat>,
    starting_stack: Chips,
    small_blind: Chips,
    big_blind: Chips,
    pot: Chips,
    current_bet: Chips,
    min_raise: Chips,
    current: Option<usize>,
    history: VecDeque<ActionRecord>,
}

impl BettingState {
    /// The maximum number of history entries.
    pub const HISTORY_CAPACITY: usize = 256;

    /// Creates a betting state, each player starts with `starting_stack` chips.
    pub fn new(
        players: &[PlayerId],
        starting_stack: Chips,
        small_blind: Chips,
        big_blind: Chips,
    ) -> Self {
        let seats = players
            .iter()
            .map(|p| Seat::new(p.clone(), starting_stack))
            .collect();

        Self {
            seats,
            starting_stack,
            small_blind,
            big_blind,
            pot: Chips::ZERO,
            current_bet: Chips::ZERO,
            min_raise: big_blind,
            current: None,
            history: VecDeque::default(),
        }
    }

    /// Starts a new hand, posts blinds and sets `first_to_act` on turn.
    ///
    /// Stacks carry over from the previous hand, players joining the hand get
    /// the starting stack and players with no chips sit out the hand.
    pub fn start_hand(
        &mut self,
        players: &[PlayerId],
        small_blind: &PlayerId,
        big_blind: &PlayerId,
        first_to_act: &PlayerId,
    ) -> Result<(), EngineError> {
        for p in [small_blind, big_blind, first_to_act] {
            if !players.contains(p) {
                return Err(EngineError::UnknownPlayer(p.clone()));
            }
        }

        self.refund_unpaid();

        self.seats = players
            .iter()
            .map(|p| {
                let stack = self
                    .seats
                    .iter()
                    .find(|s| &s.player_id == p)
                    .map(|s| s.stack)
                    .unwrap_or(self.starting_stack);
                let mut seat = Seat::new(p.clone(), stack);
                seat.is_folded = stack == Chips::ZERO;
                seat
            })
            .collect();

        self.pot = Chips::ZERO;
        self.history.clear();

        self.post_blind(small_blind, self.small_blind, PlayerAction::SmallBlind);
        self.post_blind(big_blind, self.big_blind, PlayerAction::BigBlind);

        self.current_bet = self.big_blind;
        self.min_raise = self.big_blind;
        self.current = self.first_to_act(first_to_act);

        debug!(
            "Start hand sb: {small_blind} bb: {big_blind} pot: {} current: {:?}",
            self.pot,
            self.current_player()
        );

        Ok(())
    }

    /// Gives back the bets of a hand that was never paid, returns the
    /// refunded chips.
    pub fn refund_unpaid(&mut self) -> Chips {
        let refund = self.pot;
        if refund == Chips::ZERO {
            return refund;
        }

        warn!("Refunding unpaid pot {refund}");
        for seat in &mut self.seats {
            seat.stack += seat.total_bet;
            seat.bet = Chips::ZERO;
            seat.total_bet = Chips::ZERO;
            seat.is_all_in = false;
        }

        self.pot = Chips::ZERO;
        self.current_bet = Chips::ZERO;
        self.current = None;
        refund
    }

    /// Starts a new betting round after board cards have been dealt.
    pub fn start_new_round(&mut self, first_to_act: &PlayerId) -> Result<(), EngineError> {
        self.seat_index(first_to_act)?;

        for seat in &mut self.seats {
            seat.bet = Chips::ZERO;
            seat.has_acted = false;
        }

        self.current_bet = Chips::ZERO;
        self.min_raise = self.big_blind;
        self.current = self.first_to_act(first_to_act);

        Ok(())
    }

    /// Applies an action from the player on turn.
    ///
    /// The action is validated before changing any state.
    pub fn step(&mut self, action: Action, player: &PlayerId) -> Result<RoundResult, EngineError> {
        let idx = self.seat_index(player)?;
        let current = self.current.ok_or(EngineError::NoActivePlayer)?;
        if idx != current {
            return Err(EngineError::NotPlayersTurn(player.clone()));
        }

        let kind = action.kind();
        if !self.legal_actions().contains(&kind) {
            return Err(EngineError::IllegalAction(kind));
        }

        if let Action::Raise { amount } = action {
            let min = self.min_raise_to(player);
            let max = self.max_raise_to(player);
            if amount < min || amount > max {
                return Err(EngineError::InvalidRaise { amount, min, max });
            }
        }

        match action {
            Action::Fold => {
                self.seats[idx].is_folded = true;
            }
            Action::Check => {}
            Action::Call => {
                let paid = self.seats[idx].bet_to(self.current_bet);
                self.pot += paid;
            }
            Action::Raise { amount } => {
                // A short all-in raise doesn't change the raise size.
                let raise = amount - self.current_bet;
                if raise >= self.min_raise {
                    self.min_raise = raise;
                }

                self.current_bet = amount;
                let paid = self.seats[idx].bet_to(amount);
                self.pot += paid;

                for (pos, seat) in self.seats.iter_mut().enumerate() {
                    if pos != idx {
                        seat.has_acted = false;
                    }
                }
            }
        }

        let seat = &mut self.seats[idx];
        seat.has_acted = true;
        let record = ActionRecord {
            player: seat.player_id.clone(),
            action: kind.into(),
            amount: seat.bet,
        };

        debug!("{} {} pot: {}", record.player, action, self.pot);
        self.record(record);

        if self.active_players().count() == 1 {
            let winner = self.active_players().next().cloned();
            self.current = None;
            return Ok(RoundResult {
                round_complete: true,
                hand_over: true,
                winner,
            });
        }

        let round_complete = self.is_round_complete();
        self.current = if round_complete {
            None
        } else {
            self.next_to_act(idx + 1)
        };

        Ok(RoundResult {
            round_complete,
            hand_over: false,
            winner: None,
        })
    }

    /// Checks if the current betting round is closed.
    pub fn is_round_complete(&self) -> bool {
        if self.seats.iter().filter(|s| !s.is_folded).count() < 2 {
            return true;
        }

        // A player that didn't match the bet and is not all-in has to act.
        if self
            .seats
            .iter()
            .any(|s| s.can_act() && s.bet < self.current_bet)
        {
            return false;
        }

        // Only one player has chips all others are all in.
        if self.seats.iter().filter(|s| s.can_act()).count() < 2 {
            return true;
        }

        self.seats.iter().filter(|s| s.can_act()).all(|s| s.has_acted)
    }

    /// The legal actions for the player on turn, empty if nobody is on turn.
    pub fn legal_actions(&self) -> Vec<ActionKind> {
        let Some(seat) = self.current.map(|idx| &self.seats[idx]) else {
            return Vec::new();
        };

        let to_call = self.current_bet - seat.bet;
        let mut actions = vec![ActionKind::Fold];

        if to_call == Chips::ZERO {
            actions.push(ActionKind::Check);
        }

        if to_call > Chips::ZERO && seat.stack > Chips::ZERO {
            actions.push(ActionKind::Call);
        }

        if seat.stack > to_call {
            actions.push(ActionKind::Raise);
        }

        actions
    }

    /// The minimum raise-to amount for a player, capped to the all-in amount.
    pub fn min_raise_to(&self, player: &PlayerId) -> Chips {
        let min_raise = self.min_raise.max(Chips::new(1));
        (self.current_bet + min_raise).min(self.max_raise_to(player))
    }

    /// The maximum raise-to amount for a player, that is an all-in raise.
    ///
    /// Unknown players get zero.
    pub fn max_raise_to(&self, player: &PlayerId) -> Chips {
        self.seat(player)
            .map(|s| s.bet + s.stack)
            .unwrap_or_default()
    }

    /// The chips a player needs to call, capped by the player stack.
    ///
    /// Unknown players get zero.
    pub fn to_call(&self, player: &PlayerId) -> Chips {
        self.seat(player)
            .map(|s| (self.current_bet - s.bet).min(s.stack))
            .unwrap_or_default()
    }

    /// Pays the pot to the winners.
    ///
    /// Tied winners split the pot and the odd chips go to `remainder_to`.
    pub fn payout(
        &mut self,
        winners: &[PlayerId],
        remainder_to: &PlayerId,
    ) -> Result<(), EngineError> {
        if winners.is_empty() {
            return Err(EngineError::NoWinners);
        }

        let winners = winners
            .iter()
            .map(|p| self.seat_index(p))
            .collect::<Result<Vec<_>, _>>()?;
        let remainder_idx = self.seat_index(remainder_to)?;

        let share = self.pot / winners.len() as u32;
        let remainder = self.pot % winners.len() as u32;
        for idx in winners {
            self.seats[idx].stack += share;
        }
        self.seats[remainder_idx].stack += remainder;

        debug!("Paid pot {} share: {share} remainder: {remainder}", self.pot);

        self.pot = Chips::ZERO;
        self.current_bet = Chips::ZERO;
        self.current = None;
        for seat in &mut self.seats {
            seat.bet = Chips::ZERO;
            seat.total_bet = Chips::ZERO;
        }

        Ok(())
    }

    /// The shared pot.
    pub fn pot(&self) -> Chips {
        self.pot
    }

    /// The current round target bet.
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }

    /// The minimum raise size.
    pub fn min_raise(&self) -> Chips {
        self.min_raise
    }

    /// The player on turn.
    pub fn current_player(&self) -> Option<&PlayerId> {
        self.current.map(|idx| &self.seats[idx].player_id)
    }

    /// All the seats in seat order.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// A player seat.
    pub fn seat(&self, player: &PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| &s.player_id == player)
    }

    /// A player stack.
    pub fn stack(&self, player: &PlayerId) -> Option<Chips> {
        self.seat(player).map(|s| s.stack)
    }

    /// Checks if a player is not folded and not all-in.
    pub fn can_act(&self, player: &PlayerId) -> bool {
        self.seat(player).is_some_and(Seat::can_act)
    }

    /// All stacks by player.
    pub fn stacks(&self) -> BTreeMap<PlayerId, Chips> {
        self.seats
            .iter()
            .map(|s| (s.player_id.clone(), s.stack))
            .collect()
    }

    /// The current round bets by player.
    pub fn bets(&self) -> BTreeMap<PlayerId, Chips> {
        self.seats
            .iter()
            .map(|s| (s.player_id.clone(), s.bet))
            .collect()
    }

    /// Players still in the hand.
    pub fn active_players(&self) -> impl Iterator<Item = &PlayerId> {
        self.seats
            .iter()
            .filter(|s| !s.is_folded)
            .map(|s| &s.player_id)
    }

    /// Players that folded or are sitting out.
    pub fn folded_players(&self) -> impl Iterator<Item = &PlayerId> {
        self.seats
            .iter()
            .filter(|s| s.is_folded)
            .map(|s| &s.player_id)
    }

    /// Players that are all in.
    pub fn all_in_players(&self) -> impl Iterator<Item = &PlayerId> {
        self.seats
            .iter()
            .filter(|s| s.is_all_in && !s.is_folded)
            .map(|s| &s.player_id)
    }

    /// The action history, oldest first.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = &ActionRecord> + ExactSizeIterator {
        self.history.iter()
    }

    /// The total chips at the table, stacks plus pot.
    pub fn total_chips(&self) -> Chips {
        self.seats.iter().map(|s| s.stack).sum::<Chips>() + self.pot
    }

    #[cfg(test)]
    pub(crate) fn set_stack(&mut self, player: &PlayerId, stack: Chips) {
        if let Some(seat) = self.seats.iter_mut().find(|s| &s.player_id == player) {
            seat.stack = stack;
        }
    }

    fn seat_index(&self, player: &PlayerId) -> Result<usize, EngineError> {
        self.seats
            .iter()
            .position(|s| &s.player_id == player)
            .ok_or_else(|| EngineError::UnknownPlayer(player.clone()))
    }

    fn post_blind(&mut self, player: &PlayerId, blind: Chips, action: PlayerAction) {
        let Some(seat) = self
            .seats
            .iter_mut()
            .find(|s| &s.player_id == player && !s.is_folded)
        else {
            return;
        };

        let paid = seat.bet_to(blind);
        self.pot += paid;

        let record = ActionRecord {
            player: seat.player_id.clone(),
            action,
            amount: seat.bet,
        };
        self.record(record);
    }

    /// The first seat from `player` that can act, none if the round is closed.
    fn first_to_act(&self, player: &PlayerId) -> Option<usize> {
        if self.is_round_complete() {
            return None;
        }

        let idx = self.seats.iter().position(|s| &s.player_id == player)?;
        self.next_to_act(idx)
    }

    fn next_to_act(&self, from: usize) -> Option<usize> {
        let n = self.seats.len();
        (0..n)
            .map(|offset| (from + offset) % n)
            .find(|&idx| self.seats[idx].can_act())
    }

    fn record(&mut self, record: ActionRecord) {
        if self.history.len() == Self::HISTORY_CAPACITY {
            self.history.pop_front();
        }

        self.history.push_back(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<PlayerId> {
        (1..=n).map(|i| PlayerId::new(format!("p{i}"))).collect()
    }

    fn p(id: &str) -> PlayerId {
        PlayerId::from(id)
    }

    fn raise(amount: u32) -> Action {
        Action::Raise {
            amount: Chips::new(amount),
        }
    }

    // Three players, p1 button, p2 small blind, p3 big blind, p1 first to act.
    fn three_way(sb: u32, bb: u32) -> BettingState {
        let players = ids(3);
        let mut state = BettingState::new(&players, Chips::new(1000), Chips::new(sb), Chips::new(bb));
        state
            .start_hand(&players, &p("p2"), &p("p3"), &p("p1"))
            .unwrap();
        state
    }

    #[test]
    fn post_blinds() {
        let state = three_way(5, 10);
        assert_eq!(state.pot(), Chips::new(15));
        assert_eq!(state.current_bet(), Chips::new(10));
        assert_eq!(state.min_raise(), Chips::new(10));
        assert_eq!(state.current_player(), Some(&p("p1")));
        assert_eq!(state.stack(&p("p2")), Some(Chips::new(995)));
        assert_eq!(state.stack(&p("p3")), Some(Chips::new(990)));
        assert_eq!(state.bets()[&p("p3")], Chips::new(10));

        let history = state.history().map(|r| r.action).collect::<Vec<_>>();
        assert_eq!(history, [PlayerAction::SmallBlind, PlayerAction::BigBlind]);

        assert_eq!(
            state.legal_actions(),
            [ActionKind::Fold, ActionKind::Call, ActionKind::Raise]
        );
        assert_eq!(state.to_call(&p("p1")), Chips::new(10));
        assert_eq!(state.to_call(&p("p2")), Chips::new(5));
        assert_eq!(state.min_raise_to(&p("p1")), Chips::new(20));
        assert_eq!(state.max_raise_to(&p("p1")), Chips::new(1000));
        assert_eq!(state.max_raise_to(&p("p3")), Chips::new(1000));
    }

    #[test]
    fn round_completes_when_all_matched_and_acted() {
        let mut state = three_way(10, 20);

        let res = state.step(Action::Call, &p("p1")).unwrap();
        assert!(!res.round_complete);
        let res = state.step(Action::Call, &p("p2")).unwrap();
        assert!(!res.round_complete);

        // The big blind has the option to check the matched target.
        assert_eq!(state.current_player(), Some(&p("p3")));
        assert_eq!(
            state.legal_actions(),
            [ActionKind::Fold, ActionKind::Check, ActionKind::Raise]
        );
        let res = state.step(Action::Check, &p("p3")).unwrap();
        assert!(res.round_complete);
        assert!(!res.hand_over);
        assert_eq!(state.current_player(), None);
        assert_eq!(state.pot(), Chips::new(60));
    }

    #[test]
    fn raise_reopens_action() {
        let mut state = three_way(5, 10);

        state.step(Action::Call, &p("p1")).unwrap();
        state.step(Action::Call, &p("p2")).unwrap();
        state.step(raise(30), &p("p3")).unwrap();
        assert_eq!(state.current_bet(), Chips::new(30));
        assert_eq!(state.min_raise(), Chips::new(20));
        assert_eq!(state.min_raise_to(&p("p1")), Chips::new(50));

        // Players who called must act again.
        assert_eq!(state.current_player(), Some(&p("p1")));
        let res = state.step(Action::Call, &p("p1")).unwrap();
        assert!(!res.round_complete);
        let res = state.step(Action::Call, &p("p2")).unwrap();
        assert!(res.round_complete);
        assert_eq!(state.pot(), Chips::new(90));
    }

    #[test]
    fn new_round_resets_bets() {
        let mut state = three_way(5, 10);
        state.step(Action::Call, &p("p1")).unwrap();
        state.step(Action::Call, &p("p2")).unwrap();
        state.step(Action::Check, &p("p3")).unwrap();

        state.start_new_round(&p("p2")).unwrap();
        assert_eq!(state.current_bet(), Chips::ZERO);
        assert_eq!(state.pot(), Chips::new(30));
        assert!(state.bets().values().all(|b| *b == Chips::ZERO));
        assert_eq!(state.current_player(), Some(&p("p2")));
        assert_eq!(
            state.legal_actions(),
            [ActionKind::Fold, ActionKind::Check, ActionKind::Raise]
        );
        assert_eq!(state.min_raise_to(&p("p2")), Chips::new(10));

        state.step(Action::Check, &p("p2")).unwrap();
        state.step(Action::Check, &p("p3")).unwrap();
        let res = state.step(Action::Check, &p("p1")).unwrap();
        assert!(res.round_complete);

        // Every seat has the same hand contribution.
        assert!(state.seats().iter().all(|s| s.total_bet == Chips::new(10)));
    }

    #[test]
    fn fold_out_ends_hand() {
        let mut state = three_way(5, 10);

        let res = state.step(Action::Fold, &p("p1")).unwrap();
        assert!(!res.hand_over);
        let res = state.step(Action::Fold, &p("p2")).unwrap();
        assert!(res.hand_over);
        assert_eq!(res.winner, Some(p("p3")));
        assert_eq!(state.current_player(), None);
        assert_eq!(state.active_players().collect::<Vec<_>>(), [&p("p3")]);
        assert_eq!(state.folded_players().count(), 2);

        state.payout(&[p("p3")], &p("p1")).unwrap();
        assert_eq!(state.pot(), Chips::ZERO);
        assert_eq!(state.stack(&p("p3")), Some(Chips::new(1005)));
        assert_eq!(state.stack(&p("p2")), Some(Chips::new(995)));
        assert_eq!(state.total_chips(), Chips::new(3000));
    }

    #[test]
    fn rejected_actions_leave_state_unchanged() {
        let mut state = three_way(5, 10);
        let before = state.clone();

        assert_eq!(
            state.step(Action::Call, &p("p2")),
            Err(EngineError::NotPlayersTurn(p("p2")))
        );
        assert_eq!(
            state.step(Action::Call, &p("p9")),
            Err(EngineError::UnknownPlayer(p("p9")))
        );
        assert_eq!(
            state.step(Action::Check, &p("p1")),
            Err(EngineError::IllegalAction(ActionKind::Check))
        );
        assert_eq!(
            state.step(raise(15), &p("p1")),
            Err(EngineError::InvalidRaise {
                amount: Chips::new(15),
                min: Chips::new(20),
                max: Chips::new(1000),
            })
        );
        assert!(matches!(
            state.step(raise(1001), &p("p1")),
            Err(EngineError::InvalidRaise { .. })
        ));
        assert_eq!(state, before);

        // No player on turn after the round closes.
        state.step(Action::Fold, &p("p1")).unwrap();
        state.step(Action::Fold, &p("p2")).unwrap();
        let after = state.clone();
        assert_eq!(
            state.step(Action::Check, &p("p3")),
            Err(EngineError::NoActivePlayer)
        );
        assert_eq!(state, after);
    }

    #[test]
    fn all_in_call_and_short_raise() {
        let players = ids(3);
        let mut state = BettingState::new(&players, Chips::new(1000), Chips::new(5), Chips::new(10));
        state.set_stack(&p("p1"), Chips::new(50));
        state.set_stack(&p("p2"), Chips::new(25));
        state
            .start_hand(&players, &p("p2"), &p("p3"), &p("p1"))
            .unwrap();

        // p1 can only raise all in.
        state.step(raise(50), &p("p1")).unwrap();
        assert!(state.seat(&p("p1")).unwrap().is_all_in);

        // p2 calls short and goes all in.
        assert_eq!(state.to_call(&p("p2")), Chips::new(20));
        assert_eq!(
            state.legal_actions(),
            [ActionKind::Fold, ActionKind::Call]
        );
        state.step(Action::Call, &p("p2")).unwrap();
        assert!(state.seat(&p("p2")).unwrap().is_all_in);
        assert_eq!(state.all_in_players().count(), 2);

        // p3 is the only player that can act and must still match the bet.
        assert_eq!(state.current_player(), Some(&p("p3")));
        assert!(!state.is_round_complete());
        let res = state.step(Action::Call, &p("p3")).unwrap();
        assert!(res.round_complete);
        assert_eq!(state.pot(), Chips::new(125));
        assert_eq!(state.total_chips(), Chips::new(1075));

        // Nobody can bet on later rounds.
        state.start_new_round(&p("p2")).unwrap();
        assert_eq!(state.current_player(), None);
        assert!(state.is_round_complete());
        assert!(state.legal_actions().is_empty());
    }

    #[test]
    fn short_stack_min_raise_is_capped() {
        let players = ids(2);
        let mut state = BettingState::new(&players, Chips::new(1000), Chips::new(5), Chips::new(10));
        state.set_stack(&p("p1"), Chips::new(15));
        state
            .start_hand(&players, &p("p1"), &p("p2"), &p("p1"))
            .unwrap();

        assert_eq!(state.min_raise_to(&p("p1")), Chips::new(15));
        assert_eq!(state.max_raise_to(&p("p1")), Chips::new(15));
        state.step(raise(15), &p("p1")).unwrap();

        // The short raise keeps the big blind raise size.
        assert_eq!(state.min_raise(), Chips::new(10));
        assert_eq!(state.current_bet(), Chips::new(15));
    }

    #[test]
    fn payout_split_with_remainder() {
        // Button p1, blinds p2 and p3, p4 first to act.
        let players = ids(4);
        let mut state = BettingState::new(&players, Chips::new(1000), Chips::new(5), Chips::new(10));
        state
            .start_hand(&players, &p("p2"), &p("p3"), &p("p4"))
            .unwrap();

        state.step(raise(25), &p("p4")).unwrap();
        state.step(Action::Call, &p("p1")).unwrap();
        state.step(Action::Call, &p("p2")).unwrap();
        let res = state.step(Action::Call, &p("p3")).unwrap();
        assert!(res.round_complete);
        assert_eq!(state.pot(), Chips::new(100));

        let winners = [p("p1"), p("p2"), p("p3")];
        assert_eq!(state.payout(&[], &p("p1")), Err(EngineError::NoWinners));
        assert_eq!(
            state.payout(&[p("p7")], &p("p1")),
            Err(EngineError::UnknownPlayer(p("p7")))
        );
        assert_eq!(state.pot(), Chips::new(100));

        state.payout(&winners, &p("p1")).unwrap();
        assert_eq!(state.stack(&p("p1")), Some(Chips::new(1009)));
        assert_eq!(state.stack(&p("p2")), Some(Chips::new(1008)));
        assert_eq!(state.stack(&p("p3")), Some(Chips::new(1008)));
        assert_eq!(state.stack(&p("p4")), Some(Chips::new(975)));
        assert_eq!(state.total_chips(), Chips::new(4000));
    }

    #[test]
    fn remainder_goes_to_button_outside_winners() {
        let players = ids(3);
        let mut state = BettingState::new(&players, Chips::new(1000), Chips::new(5), Chips::new(10));
        state
            .start_hand(&players, &p("p2"), &p("p3"), &p("p1"))
            .unwrap();
        state.step(Action::Fold, &p("p1")).unwrap();
        state.step(Action::Call, &p("p2")).unwrap();
        state.step(raise(21), &p("p3")).unwrap();
        state.step(Action::Call, &p("p2")).unwrap();
        assert_eq!(state.pot(), Chips::new(42));

        state.payout(&[p("p2"), p("p3")], &p("p1")).unwrap();
        assert_eq!(state.stack(&p("p1")), Some(Chips::new(1000)));
        assert_eq!(state.stack(&p("p2")), Some(Chips::new(1000)));
        assert_eq!(state.stack(&p("p3")), Some(Chips::new(1000)));

        let players = ids(3);
        let mut state = BettingState::new(&players, Chips::new(1000), Chips::new(5), Chips::new(10));
        state
            .start_hand(&players, &p("p2"), &p("p3"), &p("p1"))
            .unwrap();
        state.step(Action::Call, &p("p1")).unwrap();
        state.step(Action::Fold, &p("p2")).unwrap();
        state.step(Action::Check, &p("p3")).unwrap();
        assert_eq!(state.pot(), Chips::new(25));

        // The odd chip goes to the button even if the button folded.

        state.payout(&[p("p1"), p("p3")], &p("p2")).unwrap();
        assert_eq!(state.stack(&p("p1")), Some(Chips::new(1002)));
        assert_eq!(state.stack(&p("p3")), Some(Chips::new(1002)));
        assert_eq!(state.stack(&p("p2")), Some(Chips::new(996)));
    }

    #[test]
    fn sitting_out_and_refund() {
        let players = ids(3);
        let mut state = BettingState::new(&players, Chips::new(100), Chips::new(5), Chips::new(10));
        state
            .start_hand(&players, &p("p2"), &p("p3"), &p("p1"))
            .unwrap();
        state.step(raise(40), &p("p1")).unwrap();
        assert_eq!(state.total_chips(), Chips::new(300));

        // Start another hand without paying the pot.
        state
            .start_hand(&players, &p("p3"), &p("p1"), &p("p2"))
            .unwrap();
        assert_eq!(state.total_chips(), Chips::new(300));
        assert_eq!(state.stack(&p("p2")), Some(Chips::new(100)));
        assert_eq!(state.stack(&p("p1")), Some(Chips::new(90)));

        // A busted player sits out.
        let mut state = BettingState::new(&players, Chips::new(100), Chips::new(5), Chips::new(10));
        state.set_stack(&p("p1"), Chips::ZERO);
        state
            .start_hand(&players, &p("p2"), &p("p3"), &p("p1"))
            .unwrap();
        assert!(state.seat(&p("p1")).unwrap().is_folded);
        assert_eq!(state.current_player(), Some(&p("p2")));
        assert!(!state.can_act(&p("p1")));

        assert_eq!(
            state.start_hand(&players, &p("p2"), &p("p9"), &p("p1")),
            Err(EngineError::UnknownPlayer(p("p9")))
        );
    }

    #[test]
    fn refund_all_in_player() {
        let mut state = three_way(5, 10);
        state.step(raise(1000), &p("p1")).unwrap();
        assert!(state.seat(&p("p1")).unwrap().is_all_in);
        assert_eq!(state.stack(&p("p1")), Some(Chips::ZERO));

        assert_eq!(state.refund_unpaid(), Chips::new(1015));
        assert_eq!(state.pot(), Chips::ZERO);
        assert_eq!(state.current_player(), None);
        for seat in state.seats() {
            assert_eq!(seat.stack, Chips::new(1000));
            assert_eq!(seat.total_bet, Chips::ZERO);
            assert!(!seat.is_all_in);
        }

        // Nothing left to refund.
        assert_eq!(state.refund_unpaid(), Chips::ZERO);
        assert_eq!(state.total_chips(), Chips::new(3000));
    }

    #[test]
    fn conservation_over_actions() {
        let mut state = three_way(5, 10);
        let total = state.total_chips();
        let actions = [
            (Action::Call, "p1"),
            (raise(40), "p2"),
            (Action::Call, "p3"),
            (raise(100), "p1"),
            (Action::Fold, "p2"),
            (Action::Call, "p3"),
        ];

        for (action, player) in actions {
            state.step(action, &p(player)).unwrap();
            assert_eq!(state.total_chips(), total);
            for seat in state.seats() {
                assert_eq!(seat.stack + seat.total_bet, Chips::new(1000));
            }
        }

        assert!(state.is_round_complete());
    }

    #[test]
    fn history_is_bounded() {
        let players = ids(2);
        let mut state = BettingState::new(&players, Chips::new(100_000), Chips::new(1), Chips::new(2));
        state
            .start_hand(&players, &p("p1"), &p("p2"), &p("p1"))
            .unwrap();

        let mut amount = 2;
        for n in 0..300 {
            amount += 2;
            let player = if n % 2 == 0 { "p1" } else { "p2" };
            state.step(raise(amount), &p(player)).unwrap();
        }

        assert_eq!(state.history().len(), BettingState::HISTORY_CAPACITY);
        let last = state.history().next_back().unwrap();
        assert_eq!(last.action, PlayerAction::Raise);
        assert_eq!(last.amount, Chips::new(amount));
    }
}
