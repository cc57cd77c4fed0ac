// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Riverboat Poker hand evaluator.
//!
//! Poker hand evaluator for 5, 6 and 7 cards hands. A hand is scored by its
//! best 5 cards combination, the score packs the hand category and the ranks
//! that break ties within the category so that a **higher score is a stronger
//! hand** and two hands have the same score only if they split the pot.
//!
//! To use the evaluator create a hand and use [HandValue] to evaluate the hand
//! and get its rank:
//!
//! ```
//! # use riverboat_eval::*;
//! let cards = ["Ah", "Kh", "Qh", "Jh", "Th", "2c", "3d"]
//!     .iter()
//!     .map(|c| c.parse::<Card>().unwrap())
//!     .collect::<Vec<_>>();
//! let v1 = HandValue::eval(&cards);
//! assert_eq!(v1.rank(), HandRank::StraightFlush);
//! assert_eq!(v1.label(), "Royal Flush");
//!
//! let v2 = HandValue::eval(&cards[2..]);
//! assert!(v1 > v2);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod eval;
pub use eval::{HandRank, HandValue};

// Reexport cards types.
pub use riverboat_cards::{Card, Deck, Rank, Suit};
