// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
use clap::Parser;
use log::error;
use std::time::Duration;

use riverboat_bot::AiMode;
use riverboat_core::poker::Chips;
use riverboat_server::{replay::DEFAULT_REPLAY_CAPACITY, server};

#[derive(Debug, Parser)]
struct Cli {
    /// The server listening address.
    #[clap(long, short, default_value = "127.0.0.1")]
    address: String,
    /// The server listening port.
    #[clap(long, short, default_value_t = 9871)]
    port: u16,
    /// Number of seats per game, including the human seat.
    #[clap(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(2..=5))]
    seats: u8,
    /// The players starting stack.
    #[clap(long, default_value_t = 1000)]
    stack: u32,
    /// The small blind.
    #[clap(long, default_value_t = 5)]
    small_blind: u32,
    /// The big blind.
    #[clap(long, default_value_t = 10)]
    big_blind: u32,
    /// The automated players strategy: random or passive.
    #[clap(long, env = "AI_MODE", default_value = "random")]
    ai_mode: AiMode,
    /// The automated players seed.
    #[clap(long, env = "AI_SEED")]
    ai_seed: Option<u64>,
    /// The deck seed for the first hand of each session.
    #[clap(long)]
    seed: Option<u64>,
    /// Seconds before an idle session is removed.
    #[clap(long, default_value_t = 1800)]
    session_ttl: u64,
    /// Number of actions in the state history.
    #[clap(long, default_value_t = 10)]
    history_limit: usize,
    /// Record a replay log of each session actions and events.
    #[clap(long, env = "REPLAY_ENABLED")]
    replay: bool,
    /// Number of entries kept in each session replay log.
    #[clap(long, env = "REPLAY_CAPACITY", default_value_t = DEFAULT_REPLAY_CAPACITY)]
    replay_capacity: usize,
}

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    if cli.small_blind > cli.big_blind {
        error!("Small blind {} larger than big blind {}", cli.small_blind, cli.big_blind);
        return;
    }

    let config = riverboat_server::Config {
        address: cli.address,
        port: cli.port,
        seats: cli.seats as usize,
        starting_stack: Chips::new(cli.stack),
        small_blind: Chips::new(cli.small_blind),
        big_blind: Chips::new(cli.big_blind),
        ai_mode: cli.ai_mode,
        ai_seed: cli.ai_seed,
        hand_seed: cli.seed,
        session_ttl: Duration::from_secs(cli.session_ttl),
        history_limit: cli.history_limit,
        replay: cli.replay,
        replay_capacity: cli.replay_capacity,
    };

    if let Err(e) = server::run(config).await {
        error!("{e}");
    }
}
