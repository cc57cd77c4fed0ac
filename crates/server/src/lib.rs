// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Riverboat Poker server.
//!
//! Each WebSocket connection plays the human seat of a session against
//! automated players, a client that reconnects with `?session_id=<id>` resumes
//! its session.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod connection;
pub mod message;
pub mod replay;
pub mod server;
pub mod session;
pub use server::{Config, run};
