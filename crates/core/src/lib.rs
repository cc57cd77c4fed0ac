// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Riverboat Poker hand engine.
//!
//! The [Engine](engine::Engine) runs Texas Hold'em hands for 2 to 5 seats: it
//! shuffles and deals a [Deck](poker::Deck), drives the
//! [BettingState](betting::BettingState) through the preflop, flop, turn and
//! river rounds, resolves the showdown with a
//! [HandEvaluator](evaluator::HandEvaluator) and queues events for the caller
//! to drain.
//!
//! ```
//! # use riverboat_core::prelude::*;
//! let mut engine = Engine::new(EngineConfig::default());
//! engine.new_hand(Some(42), false).unwrap();
//! assert_eq!(engine.street(), Street::Preflop);
//!
//! let events = engine.drain_events();
//! assert_eq!(events[0].event, EventKind::DealHole);
//! assert!(engine.drain_events().is_empty());
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod betting;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod game_state;
pub mod message;
pub mod poker;

/// Common imports.
pub mod prelude {
    pub use crate::betting::{BettingState, RoundResult, Seat};
    pub use crate::engine::{DEFAULT_HISTORY_LIMIT, Engine, EngineConfig, HUMAN_PLAYER_ID};
    pub use crate::error::EngineError;
    pub use crate::evaluator::{Comparison, Evaluator, HandEvaluator, Outcome};
    pub use crate::game_state::{AiState, GameStatePublic};
    pub use crate::message::{
        Action, ActionKind, ActionRecord, EventData, EventKind, EventMessage, PlayerAction, Winner,
    };
    pub use crate::poker::{Card, Chips, Deck, PlayerId, Street};
}
