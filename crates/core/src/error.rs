// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Engine errors.
use thiserror::Error;

use crate::{
    message::ActionKind,
    poker::{Chips, DeckError, PlayerId},
};

/// Errors returned by the engine and the betting state.
///
/// Any operation that returns an error leaves the state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The table must have between 2 and 5 seats.
    #[error("Unsupported number of players {0}, expected 2 to 5")]
    InvalidSeatCount(usize),
    /// Less than two players have chips to play a hand.
    #[error("Not enough players with chips to start a hand")]
    NotEnoughPlayers,
    /// The player has no seat.
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),
    /// Nobody is on turn.
    #[error("No player is on turn")]
    NoActivePlayer,
    /// Another player is on turn.
    #[error("Not {0} turn")]
    NotPlayersTurn(PlayerId),
    /// The action is not in the legal set.
    #[error("Illegal action {0}")]
    IllegalAction(ActionKind),
    /// Unknown action name.
    #[error("Unknown action {0}")]
    UnknownAction(String),
    /// Raise outside of the allowed range.
    #[error("Invalid raise to {amount}, must be between {min} and {max}")]
    InvalidRaise {
        /// The requested raise-to amount.
        amount: Chips,
        /// The minimum raise-to amount.
        min: Chips,
        /// The maximum raise-to amount.
        max: Chips,
    },
    /// A payout without winners.
    #[error("Payout needs at least one winner")]
    NoWinners,
    /// No hand has been dealt.
    #[error("Hole cards not dealt")]
    HoleCardsNotDealt,
    /// The board has less than 5 cards.
    #[error("Showdown needs 5 board cards, got {0}")]
    IncompleteBoard(usize),
    /// The evaluator needs 5 to 7 cards.
    #[error("Cannot evaluate a hand with {0} cards")]
    InvalidHandSize(usize),
    /// The hand is over or was never started.
    #[error("No hand in progress")]
    NoHandInProgress,
    /// The hand cannot deal more cards on this street.
    #[error("Cannot deal the {0} street now")]
    InvalidStreet(crate::poker::Street),
    /// Deck error.
    #[error(transparent)]
    Deck(#[from] DeckError),
}
