// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Riverboat Poker server entry point.
use anyhow::{Result, anyhow};
use log::{error, info, warn};
use std::{future::Future, net::SocketAddr, sync::Arc, time::Instant};
use tokio::{
    net::{TcpListener, TcpStream},
    signal,
    sync::{broadcast, mpsc},
    time::{self, Duration},
};

use riverboat_bot::AiMode;
use riverboat_core::{engine::EngineConfig, poker::Chips};

use crate::{
    connection::{self, Connection, ConnectionError},
    message::{ClientMessage, ServerMessage},
    session::{SessionConfig, SessionStore, SharedSession},
};

/// Server config.
#[derive(Debug, Clone)]
pub struct Config {
    /// The server listening address.
    pub address: String,
    /// The server listening port.
    pub port: u16,
    /// The number of seats per game, including the human seat.
    pub seats: usize,
    /// The players starting stack.
    pub starting_stack: Chips,
    /// The small blind.
    pub small_blind: Chips,
    /// The big blind.
    pub big_blind: Chips,
    /// The automated players strategy.
    pub ai_mode: AiMode,
    /// The automated players seed.
    pub ai_seed: Option<u64>,
    /// The seed of the first hand of each session.
    pub hand_seed: Option<u64>,
    /// Idle sessions are removed after this time.
    pub session_ttl: Duration,
    /// The number of actions in the state history.
    pub history_limit: usize,
    /// Record a replay log for each session.
    pub replay: bool,
    /// The number of replay entries kept for each session.
    pub replay_capacity: usize,
}

impl Config {
    fn session_config(&self) -> SessionConfig {
        let mut engine = EngineConfig::with_seats(self.seats);
        engine.starting_stack = self.starting_stack;
        engine.small_blind = self.small_blind;
        engine.big_blind = self.big_blind;

        SessionConfig {
            engine,
            ai_mode: self.ai_mode,
            ai_seed: self.ai_seed,
            hand_seed: self.hand_seed,
            ttl: self.session_ttl,
            replay: self.replay,
            replay_capacity: self.replay_capacity,
        }
    }
}

/// The server that handles client connections.
struct Server {
    /// The game sessions.
    store: Arc<SessionStore>,
    /// The number of actions in the state history.
    history_limit: usize,
    /// The server listener.
    listener: TcpListener,
    /// Shutdown notification channel.
    shutdown_broadcast_tx: broadcast::Sender<()>,
    /// Shutdown sender cloned by each connection.
    shutdown_complete_tx: mpsc::Sender<()>,
}

/// Client connection handler.
struct Handler {
    /// The game sessions.
    store: Arc<SessionStore>,
    /// The number of actions in the state history.
    history_limit: usize,
    /// Channel for listening shutdown notification.
    shutdown_broadcast_rx: broadcast::Receiver<()>,
    /// Sender that drops when this connection is done.
    _shutdown_complete_tx: mpsc::Sender<()>,
}

/// Server entry point.
pub async fn run(config: Config) -> Result<()> {
    let addr = format!("{}:{}", config.address, config.port);
    info!("Starting server listening on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow!("Tcp listener bind error: {e}"))?;

    serve(listener, config, signal::ctrl_c()).await
}

/// Serves connections from `listener` until `shutdown_signal` completes.
pub async fn serve<F: Future>(
    listener: TcpListener,
    config: Config,
    shutdown_signal: F,
) -> Result<()> {
    info!(
        "Serving {} seats games, AI mode {}, session ttl {}s",
        config.seats,
        config.ai_mode,
        config.session_ttl.as_secs()
    );

    let (shutdown_broadcast_tx, _) = broadcast::channel(1);
    let (shutdown_complete_tx, mut shutdown_complete_rx) = mpsc::channel(1);

    let mut server = Server {
        store: Arc::new(SessionStore::new(config.session_config())),
        history_limit: config.history_limit,
        listener,
        shutdown_broadcast_tx,
        shutdown_complete_tx,
    };

    server.spawn_expiry_task();

    tokio::select! {
        res = server.run() => {
            res.map_err(|e| anyhow!("Tcp listener accept error: {e}"))?;
        }
        _ = shutdown_signal => {
            info!("Received shutdown signal...");
        }
    }

    let Server {
        shutdown_broadcast_tx,
        shutdown_complete_tx,
        ..
    } = server;

    // Notify all tasks to start shutdown then wait for all tasks to terminate
    // and drop their shutdown channel.
    drop(shutdown_broadcast_tx);
    drop(shutdown_complete_tx);
    let _ = shutdown_complete_rx.recv().await;

    Ok(())
}

impl Server {
    /// Runs the server.
    async fn run(&mut self) -> Result<()> {
        loop {
            let (socket, addr) = self.accept_with_retry().await?;
            info!("Accepted connection from {addr}");

            let mut handler = Handler {
                store: self.store.clone(),
                history_limit: self.history_limit,
                shutdown_broadcast_rx: self.shutdown_broadcast_tx.subscribe(),
                _shutdown_complete_tx: self.shutdown_complete_tx.clone(),
            };

            // Spawn a task to handle connection messages.
            tokio::spawn(async move {
                if let Err(err) = handler.run(socket).await {
                    error!("Connection to {addr} {err}");
                }

                info!("Connection to {addr} closed");
            });
        }
    }

    /// Accepts a connection with retries.
    async fn accept_with_retry(&self) -> Result<(TcpStream, SocketAddr)> {
        let mut retry = 0;
        loop {
            match self.listener.accept().await {
                Ok((socket, addr)) => {
                    return Ok((socket, addr));
                }
                Err(err) => {
                    if retry == 5 {
                        return Err(err.into());
                    }
                }
            }

            time::sleep(Duration::from_secs(1 << retry)).await;
            retry += 1;
        }
    }

    /// Spawns a task that removes idle sessions.
    fn spawn_expiry_task(&self) {
        let store = self.store.clone();
        let mut shutdown_broadcast_rx = self.shutdown_broadcast_tx.subscribe();
        let shutdown_complete_tx = self.shutdown_complete_tx.clone();
        let period = store
            .ttl()
            .min(Duration::from_secs(60))
            .max(Duration::from_secs(1));

        tokio::spawn(async move {
            let _shutdown_complete_tx = shutdown_complete_tx;
            let mut interval = time::interval(period);

            loop {
                tokio::select! {
                    _ = shutdown_broadcast_rx.recv() => break,
                    _ = interval.tick() => {
                        let expired = store.expire(Instant::now());
                        if expired > 0 {
                            info!("Removed {expired} idle sessions, {} active", store.len());
                        }
                    }
                }
            }
        });
    }
}

impl Handler {
    /// Handle connection messages.
    async fn run(&mut self, socket: TcpStream) -> Result<()> {
        let (mut conn, session_id) = connection::accept_async(socket).await?;

        let (session, created) = self
            .store
            .get_or_create(session_id.as_deref(), Instant::now());

        let res = match self.resume(&session, created) {
            Ok(msgs) => self.handle_session(&mut conn, &session, msgs).await,
            Err(err) => {
                let _ = conn.send(&ServerMessage::Error(err.to_string())).await;
                Err(err)
            }
        };

        conn.close().await;
        res
    }

    async fn handle_session(
        &mut self,
        conn: &mut Connection,
        session: &SharedSession,
        msgs: Vec<ServerMessage>,
    ) -> Result<()> {
        let id = session.lock().id().to_string();
        send_all(conn, &msgs).await?;

        loop {
            tokio::select! {
                _ = self.shutdown_broadcast_rx.recv() => {
                    break Ok(());
                }
                res = conn.recv() => match res {
                    Some(Ok(msg)) => {
                        self.store.touch(&id, Instant::now());
                        let msgs = self.handle_message(session, msg);
                        send_all(conn, &msgs).await?;
                    }
                    Some(Err(ConnectionError::Malformed(err))) => {
                        warn!("Session {id} malformed message {err}");
                        let msg = ServerMessage::Error(format!("Malformed message: {err}"));
                        conn.send(&msg).await?;
                    }
                    Some(Err(err)) => break Err(err.into()),
                    None => break Ok(()),
                },
            }
        }
    }

    /// Starts a new session game or brings an existing one up to date, returns
    /// the messages for the client.
    fn resume(&self, session: &SharedSession, created: bool) -> Result<Vec<ServerMessage>> {
        let mut session = session.lock();
        if created {
            session.start()?;
        } else {
            info!("Resumed session {}", session.id());
            session.advance()?;
        }

        Ok(session.outbound(self.history_limit))
    }

    fn handle_message(&self, session: &SharedSession, msg: ClientMessage) -> Vec<ServerMessage> {
        session.lock().respond(msg, self.history_limit)
    }
}

async fn send_all(conn: &mut Connection, msgs: &[ServerMessage]) -> Result<()> {
    for msg in msgs {
        conn.send(msg).await?;
    }

    Ok(())
}
