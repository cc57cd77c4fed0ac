// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hand strength evaluation used at showdown.
use std::{cmp::Ordering, fmt::Debug};

use crate::{
    error::EngineError,
    poker::{Card, HandRank, HandValue},
};

/// Which side of a comparison has the stronger hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The first hand is stronger.
    First,
    /// The second hand is stronger.
    Second,
    /// Both hands have the same strength.
    Tie,
}

/// The result of comparing two hands on the same board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison<S> {
    /// The stronger side.
    pub outcome: Outcome,
    /// The first hand score.
    pub first: S,
    /// The second hand score.
    pub second: S,
}

/// A hand strength evaluator.
///
/// Scores are totally ordered and a **higher score is a stronger hand**, equal
/// scores split the pot.
pub trait HandEvaluator {
    /// The hand strength score.
    type Score: Copy + Ord + Debug;

    /// Scores the best 5 cards hand from the hole cards and the board.
    fn evaluate(&self, hole: &[Card], board: &[Card]) -> Result<Self::Score, EngineError>;

    /// The hand category label for a score.
    fn category(&self, score: Self::Score) -> String;

    /// Compares two hands on the same board.
    fn compare(
        &self,
        first: &[Card],
        second: &[Card],
        board: &[Card],
    ) -> Result<Comparison<Self::Score>, EngineError> {
        let first = self.evaluate(first, board)?;
        let second = self.evaluate(second, board)?;
        let outcome = match first.cmp(&second) {
            Ordering::Greater => Outcome::First,
            Ordering::Less => Outcome::Second,
            Ordering::Equal => Outcome::Tie,
        };

        Ok(Comparison {
            outcome,
            first,
            second,
        })
    }
}

/// The 5 to 7 cards evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl HandEvaluator for Evaluator {
    type Score = u32;

    fn evaluate(&self, hole: &[Card], board: &[Card]) -> Result<u32, EngineError> {
        let n = hole.len() + board.len();
        if !(5..=7).contains(&n) {
            return Err(EngineError::InvalidHandSize(n));
        }

        let mut cards = Vec::with_capacity(n);
        cards.extend_from_slice(hole);
        cards.extend_from_slice(board);
        Ok(HandValue::eval(&cards).score())
    }

    fn category(&self, score: u32) -> String {
        HandRank::label_for_score(score).to_string()
    }
}
