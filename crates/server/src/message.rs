// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! JSON messages exchanged by a client and the server.
use serde::{Deserialize, Serialize};

use riverboat_core::{
    game_state::GameStatePublic,
    message::EventMessage,
    poker::Chips,
};

use crate::replay::ReplayEntry;

/// Message sent from the server to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "UPPERCASE")]
pub enum ServerMessage {
    /// The game state as seen by the client.
    State(GameStatePublic),
    /// An engine event.
    Event(EventMessage),
    /// A rejected request, the session stays open.
    Error(String),
    /// The session replay log from the oldest entry.
    Replay(Vec<ReplayEntry>),
}

/// Message sent from a client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// The human player action.
    Move {
        /// The action name, case insensitive.
        val: String,
        /// The raise-to amount, required for raises.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<Chips>,
    },
    /// Start the next hand.
    NewHand,
    /// Request the session replay log.
    Replay,
}

#[cfg(test)]
mod tests {
    use super::*;
    use riverboat_core::prelude::*;
    use serde_json::json;

    #[test]
    fn client_message_format() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"MOVE","val":"call"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Move {
                val: "call".to_string(),
                amount: None
            }
        );

        let msg: ClientMessage =
            serde_json::from_value(json!({"type": "MOVE", "val": "RAISE", "amount": 40})).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Move {
                val: "RAISE".to_string(),
                amount: Some(Chips::new(40))
            }
        );

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"NEW_HAND"}"#).unwrap();
        assert_eq!(msg, ClientMessage::NewHand);

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"REPLAY"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Replay);

        assert!(serde_json::from_str::<ClientMessage>("{bad json").is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"JOIN"}"#).is_err());
    }

    #[test]
    fn server_message_format() {
        let msg = ServerMessage::Error("Illegal action CHECK".to_string());
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "ERROR", "payload": "Illegal action CHECK"})
        );

        let msg = ServerMessage::Event(EventMessage::deal(
            EventKind::DealHole,
            Street::Preflop,
            vec![],
        ));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "EVENT");
        assert_eq!(value["payload"]["event"], "DEAL_HOLE");

        let mut engine = Engine::new(EngineConfig::with_seats(2));
        engine.new_hand(Some(1), false).unwrap();
        let state = engine.to_public_state(Some(&PlayerId::from("p1")), 10, Some("abc"));
        let value = serde_json::to_value(ServerMessage::State(state)).unwrap();
        assert_eq!(value["type"], "STATE");
        assert_eq!(value["payload"]["session_id"], "abc");
        assert_eq!(value["payload"]["street"], "preflop");
        assert_eq!(value["payload"]["current_player"], "p1");
        assert_eq!(value["payload"]["hand"].as_array().unwrap().len(), 2);
    }
}
