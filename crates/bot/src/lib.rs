// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Riverboat automated players.
//!
//! A [Strategy] picks a legal action for the seat on turn given the engine
//! decision state:
//!
//! ```
//! # use riverboat_bot::{AiMode, new_strategy};
//! # use riverboat_core::prelude::*;
//! let mut engine = Engine::new(EngineConfig::with_seats(3));
//! engine.new_hand(Some(1), false).unwrap();
//!
//! let mut strategy = new_strategy(AiMode::Passive, Some(7));
//! let state = engine.to_ai_state();
//! let action = strategy.execute(&state).unwrap();
//! assert_eq!(action, Action::Call);
//! engine.step(action, &state.current_player).unwrap();
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

mod strategy;
pub use strategy::{AiMode, PassiveStrategy, RandomStrategy, Strategy, new_strategy};
