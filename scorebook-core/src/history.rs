//! Bounded undo history
//!
//! A single linear stack of full [`GameState`] snapshots. Pushing past the
//! capacity evicts the oldest snapshot first; there is no redo.

use crate::types::GameState;
use std::collections::VecDeque;

/// Undo stack of game state snapshots, oldest first
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<GameState>,
    capacity: usize,
}

impl History {
    /// Empty history holding at most `capacity` snapshots
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// History restored from persisted snapshots (oldest first)
    ///
    /// Only the most recent `capacity` snapshots are kept.
    pub fn from_snapshots(snapshots: Vec<GameState>, capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        let skip = snapshots.len().saturating_sub(history.capacity);
        history.snapshots.extend(snapshots.into_iter().skip(skip));
        history
    }

    /// Push a snapshot, returning the evicted oldest one if full
    pub fn push(&mut self, snapshot: GameState) -> Option<GameState> {
        let evicted = if self.snapshots.len() >= self.capacity {
            self.snapshots.pop_front()
        } else {
            None
        };
        self.snapshots.push_back(snapshot);
        evicted
    }

    /// Take the most recent snapshot
    pub fn pop(&mut self) -> Option<GameState> {
        self.snapshots.pop_back()
    }

    /// Drop every snapshot
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether undo has nothing to restore
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Maximum number of snapshots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshots, oldest first
    pub fn snapshots(&self) -> impl Iterator<Item = &GameState> {
        self.snapshots.iter()
    }
}
