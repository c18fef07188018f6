//! Rolling context ledger
//!
//! FIFO window over the most recent turns. Serialized as a plain sequence of
//! turns; the bound is runtime configuration and is re-applied after loading.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::memory::store::Turn;

/// Default number of turns kept in context
pub const DEFAULT_CONTEXT_SIZE: usize = 5;

/// Bounded window of recent turns, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Turn>", into = "Vec<Turn>")]
pub struct ContextLedger {
    turns: VecDeque<Turn>,
    capacity: usize,
}

impl ContextLedger {
    /// Create an empty ledger holding at most `capacity` turns
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        ContextLedger {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a turn, evicting the oldest ones past capacity
    ///
    /// Complexity: O(1) amortized
    pub fn push(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        self.evict();
    }

    /// Change the bound, evicting immediately if the window shrinks
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.evict();
    }

    /// User text of the most recent turn
    pub fn last_topic(&self) -> Option<&str> {
        self.turns.back().map(|turn| turn.user.as_str())
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict(&mut self) {
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }
}

impl Default for ContextLedger {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CONTEXT_SIZE)
    }
}

impl From<Vec<Turn>> for ContextLedger {
    // Keeps every stored turn; the configured bound is applied afterwards.
    fn from(turns: Vec<Turn>) -> Self {
        let capacity = turns.len().max(DEFAULT_CONTEXT_SIZE);
        ContextLedger {
            turns: turns.into(),
            capacity,
        }
    }
}

impl From<ContextLedger> for Vec<Turn> {
    fn from(ledger: ContextLedger) -> Self {
        ledger.turns.into()
    }
}
