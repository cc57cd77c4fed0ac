// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Game sessions and the sessions registry.
use ahash::AHashMap;
use anyhow::{Result, bail};
use log::{debug, info};
use parking_lot::Mutex;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use uuid::Uuid;

use riverboat_bot::{AiMode, Strategy, new_strategy};
use riverboat_core::{
    engine::{Engine, EngineConfig},
    error::EngineError,
    message::{Action, ActionKind, EventMessage},
    poker::{Chips, PlayerId},
};

use crate::{
    message::{ClientMessage, ServerMessage},
    replay::{DEFAULT_REPLAY_CAPACITY, ReplayLog, ReplayRecord},
};

/// Sessions configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The engine configuration for new games.
    pub engine: EngineConfig,
    /// The automated players strategy.
    pub ai_mode: AiMode,
    /// The automated players seed, random if none.
    pub ai_seed: Option<u64>,
    /// The seed of the first hand, following hands increment it.
    pub hand_seed: Option<u64>,
    /// Idle sessions are removed after this time.
    pub ttl: Duration,
    /// Record a replay log for each session.
    pub replay: bool,
    /// The number of replay entries kept for each session.
    pub replay_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            ai_mode: AiMode::default(),
            ai_seed: None,
            hand_seed: None,
            ttl: SessionStore::DEFAULT_TTL,
            replay: false,
            replay_capacity: DEFAULT_REPLAY_CAPACITY,
        }
    }
}

/// A game session: the human seat plays against automated seats.
pub struct Session {
    id: String,
    config: EngineConfig,
    engine: Engine,
    strategy: Box<dyn Strategy>,
    hand_seed: Option<u64>,
    hands: u64,
    events: Vec<EventMessage>,
    replay: Option<ReplayLog>,
}

impl Session {
    /// Maximum automated actions between two human actions.
    const MAX_BOT_ACTIONS: usize = 10_000;

    /// Creates a session, no hand is dealt until [Session::start].
    pub fn new(id: String, config: &SessionConfig) -> Self {
        Self {
            id,
            config: config.engine.clone(),
            engine: Engine::new(config.engine.clone()),
            strategy: new_strategy(config.ai_mode, config.ai_seed),
            hand_seed: config.hand_seed,
            hands: 0,
            events: Vec::default(),
            replay: config
                .replay
                .then(|| ReplayLog::new(config.replay_capacity)),
        }
    }

    /// The session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The session engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The replay log, none if replay is disabled.
    pub fn replay(&self) -> Option<&ReplayLog> {
        self.replay.as_ref()
    }

    /// Deals the first hand and plays automated seats until the human is on
    /// turn.
    pub fn start(&mut self) -> Result<()> {
        let seed = self.next_seed();
        self.engine.new_hand(seed, false)?;
        self.collect_events();
        self.advance()
    }

    /// Responds to a client request with the messages for the client.
    pub fn respond(&mut self, msg: ClientMessage, history_limit: usize) -> Vec<ServerMessage> {
        if msg == ClientMessage::Replay {
            return match &self.replay {
                Some(log) => vec![ServerMessage::Replay(log.entries().cloned().collect())],
                None => vec![ServerMessage::Error("Replay is disabled".to_string())],
            };
        }

        match self.handle(msg) {
            Ok(()) => self.outbound(history_limit),
            Err(err) => vec![ServerMessage::Error(err.to_string())],
        }
    }

    /// Handles a client request.
    ///
    /// A rejected move leaves the game unchanged.
    pub fn handle(&mut self, msg: ClientMessage) -> Result<()> {
        match msg {
            ClientMessage::Move { val, amount } => {
                let kind = val.parse::<ActionKind>()?;
                let amount = match (kind, amount) {
                    (ActionKind::Raise, None) => bail!("RAISE requires an amount"),
                    (_, amount) => amount.unwrap_or(Chips::ZERO),
                };

                let human = self.engine.human_player().clone();
                self.play(Action::from_kind(kind, amount), human)?;
            }
            ClientMessage::NewHand => self.next_hand()?,
            ClientMessage::Replay => {}
        }

        self.advance()
    }

    /// Plays automated seats until the human is on turn, finished hands are
    /// followed by a new hand.
    pub fn advance(&mut self) -> Result<()> {
        for _ in 0..Self::MAX_BOT_ACTIONS {
            if self.engine.is_hand_over() {
                self.next_hand()?;
                continue;
            }

            match self.engine.current_player() {
                Some(player) if player != self.engine.human_player() => {
                    let state = self.engine.to_ai_state();
                    let action = self.strategy.execute(&state)?;
                    debug!("Session {} {} {action}", self.id, state.current_player);
                    self.play(action, state.current_player)?;
                }
                _ => return Ok(()),
            }
        }

        bail!("Session {} automated players didn't complete", self.id)
    }

    /// Drains the engine events and returns them followed by the state.
    pub fn outbound(&mut self, history_limit: usize) -> Vec<ServerMessage> {
        self.collect_events();
        let mut msgs = std::mem::take(&mut self.events)
            .into_iter()
            .map(ServerMessage::Event)
            .collect::<Vec<_>>();

        let human = self.engine.human_player();
        let state = self
            .engine
            .to_public_state(Some(human), history_limit, Some(&self.id));
        msgs.push(ServerMessage::State(state));
        msgs
    }

    /// Starts the next hand, or a new game if the human is busted or the
    /// automated players are.
    fn next_hand(&mut self) -> Result<()> {
        let seed = self.next_seed();
        let human = self.engine.human_player();
        let busted = self.engine.stack(human) == Some(Chips::ZERO);

        let res = if busted {
            Err(EngineError::NotEnoughPlayers)
        } else {
            self.engine.start_next_hand(seed)
        };

        match res {
            Ok(()) => {}
            Err(EngineError::NotEnoughPlayers) => {
                info!("Session {} game over, starting a new game", self.id);
                self.engine = Engine::new(self.config.clone());
                self.engine.new_hand(seed, false)?;
            }
            Err(e) => return Err(e.into()),
        }

        self.collect_events();
        Ok(())
    }

    /// Applies an action and records it with the events it caused.
    fn play(&mut self, action: Action, player: PlayerId) -> Result<()> {
        self.engine.step(action, &player)?;

        if let Some(replay) = &mut self.replay {
            replay.push(self.hands, ReplayRecord::Action { player, action });
        }

        self.collect_events();
        Ok(())
    }

    /// Moves the engine events to the session queue and the replay log.
    fn collect_events(&mut self) {
        let events = self.engine.drain_events();
        if let Some(replay) = &mut self.replay {
            for event in &events {
                replay.push(self.hands, ReplayRecord::Event(event.clone()));
            }
        }

        self.events.extend(events);
    }

    fn next_seed(&mut self) -> Option<u64> {
        let seed = self.hand_seed.map(|s| s.wrapping_add(self.hands));
        self.hands += 1;
        seed
    }
}

/// A shared session, the mutex serializes all the requests on the session.
pub type SharedSession = Arc<Mutex<Session>>;

struct Entry {
    session: SharedSession,
    last_seen: Instant,
}

/// The sessions registry.
pub struct SessionStore {
    sessions: Mutex<AHashMap<String, Entry>>,
    config: SessionConfig,
}

impl SessionStore {
    /// The default idle time before a session is removed.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(1800);

    /// Creates an empty registry.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: Mutex::new(AHashMap::default()),
            config,
        }
    }

    /// Returns the session with the given id or creates a new one.
    ///
    /// A known id resumes its session, an unknown or missing id creates a
    /// session with a new id. The flag is true if the session was created.
    pub fn get_or_create(&self, id: Option<&str>, now: Instant) -> (SharedSession, bool) {
        let mut sessions = self.sessions.lock();
        self.expire_locked(&mut sessions, now);

        if let Some(entry) = id.and_then(|id| sessions.get_mut(id)) {
            entry.last_seen = now;
            return (entry.session.clone(), false);
        }

        let id = Uuid::new_v4().simple().to_string();
        info!("Created session {id}");

        let session = Arc::new(Mutex::new(Session::new(id.clone(), &self.config)));
        sessions.insert(
            id,
            Entry {
                session: session.clone(),
                last_seen: now,
            },
        );

        (session, true)
    }

    /// Marks a session as active, returns false if the session doesn't exist.
    pub fn touch(&self, id: &str, now: Instant) -> bool {
        let mut sessions = self.sessions.lock();
        self.expire_locked(&mut sessions, now);

        match sessions.get_mut(id) {
            Some(entry) => {
                entry.last_seen = now;
                true
            }
            None => false,
        }
    }

    /// Removes sessions idle for longer than the ttl, returns the number of
    /// removed sessions.
    pub fn expire(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.lock();
        self.expire_locked(&mut sessions, now)
    }

    /// Removes a session.
    pub fn remove(&self, id: &str) -> Option<SharedSession> {
        self.sessions.lock().remove(id).map(|e| e.session)
    }

    /// The number of sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Checks if there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The session idle time limit.
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    fn expire_locked(&self, sessions: &mut AHashMap<String, Entry>, now: Instant) -> usize {
        let count = sessions.len();
        sessions.retain(|id, entry| {
            let keep = now.saturating_duration_since(entry.last_seen) <= self.config.ttl;
            if !keep {
                info!("Session {id} expired");
            }
            keep
        });

        count - sessions.len()
    }
}
