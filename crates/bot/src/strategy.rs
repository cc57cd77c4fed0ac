// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Automated player strategies.
use anyhow::{Result, bail};
use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use std::{fmt, str::FromStr};

use riverboat_core::{
    game_state::AiState,
    message::{Action, ActionKind},
};

/// A Poker bot strategy.
pub trait Strategy: Send + 'static {
    /// Returns a legal action for the state current player.
    fn execute(&mut self, state: &AiState) -> Result<Action>;
}

/// The strategy used by automated seats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AiMode {
    /// Uniformly random legal actions.
    #[default]
    Random,
    /// Checks or calls whenever possible.
    Passive,
}

impl FromStr for AiMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(AiMode::Random),
            "passive" => Ok(AiMode::Passive),
            mode => bail!("Unknown AI mode {mode}, expected random or passive"),
        }
    }
}

impl fmt::Display for AiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiMode::Random => write!(f, "random"),
            AiMode::Passive => write!(f, "passive"),
        }
    }
}

/// Creates a strategy, the seed is only used by random strategies.
pub fn new_strategy(mode: AiMode, seed: Option<u64>) -> Box<dyn Strategy> {
    match mode {
        AiMode::Random => Box::new(RandomStrategy::new(seed)),
        AiMode::Passive => Box::new(PassiveStrategy),
    }
}

/// Picks a legal action uniformly at random.
#[derive(Debug)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    /// Creates a strategy seeded with `seed` or with an OS seeded generator.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self { rng }
    }
}

impl Strategy for RandomStrategy {
    fn execute(&mut self, state: &AiState) -> Result<Action> {
        let Some(kind) = state.legal_actions.choose(&mut self.rng) else {
            bail!("No legal actions for {}", state.current_player);
        };

        let action = if *kind == ActionKind::Raise {
            let min = state.min_raise_to;
            let max = state.max_raise_to;
            let amount = if max < min {
                max
            } else {
                self.rng.random_range(min.amount()..=max.amount()).into()
            };

            Action::Raise { amount }
        } else {
            Action::from_kind(*kind, Default::default())
        };

        debug!("Random {} {action}", state.current_player);
        Ok(action)
    }
}

/// Checks or calls, folds when that is not possible and raises the minimum
/// only as a last resort.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveStrategy;

impl Strategy for PassiveStrategy {
    fn execute(&mut self, state: &AiState) -> Result<Action> {
        let order = [
            ActionKind::Check,
            ActionKind::Call,
            ActionKind::Fold,
            ActionKind::Raise,
        ];

        let Some(kind) = order
            .into_iter()
            .find(|kind| state.legal_actions.contains(kind))
        else {
            bail!("No legal actions for {}", state.current_player);
        };

        let amount = state.min_raise_to.min(state.max_raise_to);
        Ok(Action::from_kind(kind, amount))
    }
}
