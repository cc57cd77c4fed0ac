// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Riverboat Poker cards types.
//!
//! This crate define types to create cards:
//!
//! ```
//! # use riverboat_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! assert_eq!(ah.to_string(), "Ah");
//! assert_eq!("ah".parse::<Card>().unwrap(), ah);
//! ```
//!
//! and a [Deck] type that is shuffled once per hand and then deals cards
//! sequentially without replacement:
//!
//! ```
//! # use riverboat_cards::Deck;
//! # use rand::{SeedableRng, rngs::StdRng};
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut deck = Deck::shuffled(&mut rng);
//! let hole = deck.deal(2).unwrap();
//! assert_eq!(hole.len(), 2);
//! assert_eq!(deck.remaining(), 50);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Deck, DeckError, ParseCardError, Rank, Suit};
