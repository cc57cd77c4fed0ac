// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Actions submitted to the engine and events emitted by the engine.
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    error::EngineError,
    poker::{Card, Chips, PlayerId, Street},
};

/// An action submitted by the player on turn.
///
/// On the wire an action is `{"type": "RAISE", "amount": 40}`, the amount of a
/// raise is the total round contribution the player raises to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Action {
    /// Give up the hand.
    Fold,
    /// Pass with nothing to call.
    Check,
    /// Match the current round target.
    Call,
    /// Raise the round target to the given amount.
    Raise {
        /// The raise-to amount.
        amount: Chips,
    },
}

impl Action {
    /// The action type without its payload.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Fold => ActionKind::Fold,
            Action::Check => ActionKind::Check,
            Action::Call => ActionKind::Call,
            Action::Raise { .. } => ActionKind::Raise,
        }
    }

    /// Builds an action from its kind, amount is used only for raises.
    pub fn from_kind(kind: ActionKind, amount: Chips) -> Self {
        match kind {
            ActionKind::Fold => Action::Fold,
            ActionKind::Check => Action::Check,
            ActionKind::Call => Action::Call,
            ActionKind::Raise => Action::Raise { amount },
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Raise { amount } => write!(f, "RAISE {amount}"),
            action => write!(f, "{}", action.kind()),
        }
    }
}

/// An action type, the elements of the legal actions set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    /// Fold.
    Fold,
    /// Check.
    Check,
    /// Call.
    Call,
    /// Raise.
    Raise,
}

impl ActionKind {
    /// The action label.
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Fold => "FOLD",
            ActionKind::Check => "CHECK",
            ActionKind::Call => "CALL",
            ActionKind::Raise => "RAISE",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ActionKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FOLD" => Ok(ActionKind::Fold),
            "CHECK" => Ok(ActionKind::Check),
            "CALL" => Ok(ActionKind::Call),
            "RAISE" => Ok(ActionKind::Raise),
            _ => Err(EngineError::UnknownAction(s.to_string())),
        }
    }
}

/// An entry in the action history, including forced blinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerAction {
    /// Player pays small blind.
    SmallBlind,
    /// Player pays big blind.
    BigBlind,
    /// Player folds.
    Fold,
    /// Player checks.
    Check,
    /// Player calls.
    Call,
    /// Player raises.
    Raise,
}

impl PlayerAction {
    /// The action label.
    pub fn label(&self) -> &'static str {
        match self {
            PlayerAction::SmallBlind => "SB",
            PlayerAction::BigBlind => "BB",
            PlayerAction::Call => "CALL",
            PlayerAction::Check => "CHECK",
            PlayerAction::Raise => "RAISE",
            PlayerAction::Fold => "FOLD",
        }
    }
}

impl From<ActionKind> for PlayerAction {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Fold => PlayerAction::Fold,
            ActionKind::Check => PlayerAction::Check,
            ActionKind::Call => PlayerAction::Call,
            ActionKind::Raise => PlayerAction::Raise,
        }
    }
}

/// A recorded action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The acting player.
    pub player: PlayerId,
    /// What the player did.
    pub action: PlayerAction,
    /// The player round contribution after the action.
    pub amount: Chips,
}

/// The kind of an engine event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Hole cards dealt to every seat.
    DealHole,
    /// Three board cards dealt.
    DealFlop,
    /// The fourth board card dealt.
    DealTurn,
    /// The fifth board card dealt.
    DealRiver,
    /// The hand is over.
    HandEnd,
}

/// The hand winner, a single player or all the players that split the pot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Winner {
    /// A single winner.
    Single(PlayerId),
    /// Tied winners.
    Split(Vec<PlayerId>),
}

impl Winner {
    /// The winning players.
    pub fn players(&self) -> &[PlayerId] {
        match self {
            Winner::Single(p) => std::slice::from_ref(p),
            Winner::Split(players) => players,
        }
    }
}

/// An event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventData {
    /// Cards dealt, the cards list is empty for private hole cards deals.
    Deal {
        /// The street after the deal.
        street: Street,
        /// The revealed cards.
        cards: Vec<Card>,
    },
    /// Hand result.
    HandEnd {
        /// The winner, none if nobody won.
        winner: Option<Winner>,
        /// The winning hand category, none if the hand ended by folds.
        hand_category: Option<String>,
        /// The pot before the payout.
        pot: Chips,
    },
}

/// An event emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMessage {
    /// The event kind.
    pub event: EventKind,
    /// The event payload.
    pub data: EventData,
}

impl EventMessage {
    /// A deal event for the given street.
    pub fn deal(event: EventKind, street: Street, cards: Vec<Card>) -> Self {
        Self {
            event,
            data: EventData::Deal { street, cards },
        }
    }

    /// A hand end event.
    pub fn hand_end(winner: Option<Winner>, hand_category: Option<String>, pot: Chips) -> Self {
        Self {
            event: EventKind::HandEnd,
            data: EventData::HandEnd {
                winner,
                hand_category,
                pot,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_wire_format() {
        let raise = Action::Raise {
            amount: Chips::new(40),
        };
        assert_eq!(
            serde_json::to_value(raise).unwrap(),
            json!({"type": "RAISE", "amount": 40})
        );

        let call: Action = serde_json::from_value(json!({"type": "CALL"})).unwrap();
        assert_eq!(call, Action::Call);
        assert!(serde_json::from_value::<Action>(json!({"type": "BET"})).is_err());
    }

    #[test]
    fn action_kind_from_str() {
        assert_eq!("call".parse::<ActionKind>().unwrap(), ActionKind::Call);
        assert_eq!("Raise".parse::<ActionKind>().unwrap(), ActionKind::Raise);
        assert!(matches!(
            "bet".parse::<ActionKind>(),
            Err(EngineError::UnknownAction(_))
        ));
        assert_eq!(
            Action::from_kind(ActionKind::Raise, Chips::new(30)).to_string(),
            "RAISE 30"
        );
        assert_eq!(Action::Fold.to_string(), "FOLD");
    }

    #[test]
    fn event_wire_format() {
        let hole = EventMessage::deal(EventKind::DealHole, Street::Preflop, vec![]);
        assert_eq!(
            serde_json::to_value(&hole).unwrap(),
            json!({"event": "DEAL_HOLE", "data": {"street": "preflop", "cards": []}})
        );

        let flop = EventMessage::deal(
            EventKind::DealFlop,
            Street::Flop,
            vec!["Ah".parse().unwrap(), "Td".parse().unwrap(), "2c".parse().unwrap()],
        );
        assert_eq!(
            serde_json::to_value(&flop).unwrap(),
            json!({"event": "DEAL_FLOP", "data": {"street": "flop", "cards": ["Ah", "Td", "2c"]}})
        );

        let fold_out = EventMessage::hand_end(
            Some(Winner::Single(PlayerId::from("p2"))),
            None,
            Chips::new(15),
        );
        assert_eq!(
            serde_json::to_value(&fold_out).unwrap(),
            json!({"event": "HAND_END", "data": {"winner": "p2", "hand_category": null, "pot": 15}})
        );

        let split = EventMessage::hand_end(
            Some(Winner::Split(vec!["p1".into(), "p3".into()])),
            Some("Flush".to_string()),
            Chips::new(100),
        );
        assert_eq!(
            serde_json::to_value(&split).unwrap(),
            json!({"event": "HAND_END", "data": {"winner": ["p1", "p3"], "hand_category": "Flush", "pot": 100}})
        );
    }

    #[test]
    fn history_wire_format() {
        let record = ActionRecord {
            player: "p1".into(),
            action: PlayerAction::SmallBlind,
            amount: Chips::new(5),
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"player": "p1", "action": "SMALL_BLIND", "amount": 5})
        );
    }
}
