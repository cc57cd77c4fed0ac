// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Read-only projections of the engine state.
//!
//! Projections are rebuilt from the engine for every request and never
//! change the engine.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    message::{ActionKind, ActionRecord},
    poker::{Card, Chips, PlayerId, Street},
};

/// The game state as seen by a viewer.
///
/// Only the viewer hole cards are included, absent fields are omitted from
/// the serialized state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatePublic {
    /// The session this state belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// The current street.
    pub street: Street,
    /// The shared pot.
    pub pot: Chips,
    /// The board cards.
    pub community_cards: Vec<Card>,
    /// The viewer hole cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<Card>>,
    /// All players stacks.
    pub stacks: BTreeMap<PlayerId, Chips>,
    /// All players current round bets.
    pub bets: BTreeMap<PlayerId, Chips>,
    /// The player on turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_player: Option<PlayerId>,
    /// The legal actions for the player on turn.
    pub legal_actions: Vec<ActionKind>,
    /// The most recent actions, oldest first.
    pub action_history: Vec<ActionRecord>,
}

/// The state used by an automated player to choose an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiState {
    /// The current street.
    pub street: Street,
    /// The legal actions for the player on turn.
    pub legal_actions: Vec<ActionKind>,
    /// The minimum raise-to amount.
    pub min_raise_to: Chips,
    /// The maximum raise-to amount.
    pub max_raise_to: Chips,
    /// The chips needed to call.
    pub to_call: Chips,
    /// All players stacks.
    pub stacks: BTreeMap<PlayerId, Chips>,
    /// All players current round bets.
    pub bets: BTreeMap<PlayerId, Chips>,
    /// The deciding player.
    pub current_player: PlayerId,
}
