// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Session replay log.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use riverboat_core::{
    message::{Action, EventMessage},
    poker::PlayerId,
};

/// The default number of replay entries.
pub const DEFAULT_REPLAY_CAPACITY: usize = 10_000;

/// A recorded action or engine event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplayRecord {
    /// An accepted player action.
    Action {
        /// The acting player.
        player: PlayerId,
        /// The action.
        action: Action,
    },
    /// An engine event.
    Event(EventMessage),
}

/// A replay log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayEntry {
    /// The entry sequence number, it keeps growing when old entries are
    /// dropped.
    pub seq: u64,
    /// The session hand number, starting from 1.
    pub hand: u64,
    /// The recorded action or event.
    pub record: ReplayRecord,
}

/// A log of the most recent session actions and events.
#[derive(Debug, Clone)]
pub struct ReplayLog {
    entries: VecDeque<ReplayEntry>,
    capacity: usize,
    next_seq: u64,
}

impl ReplayLog {
    /// Creates a log that keeps the last `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_seq: 0,
        }
    }

    /// Appends a record, the oldest entry is dropped when the log is full.
    pub fn push(&mut self, hand: u64, record: ReplayRecord) {
        let seq = self.next_seq;
        self.next_seq += 1;

        if self.capacity == 0 {
            return;
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }

        self.entries.push_back(ReplayEntry { seq, hand, record });
    }

    /// The entries from the oldest.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &ReplayEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
