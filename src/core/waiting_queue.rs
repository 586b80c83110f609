//! Strict FIFO queue of accepted-but-not-started work items.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Anything that can sit in the waiting queue and be found by its dedup key.
pub trait Keyed {
    /// Dedup key of this entry.
    fn key(&self) -> &str;
}

/// In-memory FIFO queue. Arrival order is start order; there is no priority
/// and no depth bound.
pub struct WaitingQueue<I> {
    items: VecDeque<I>,
}

impl<I: Keyed> WaitingQueue<I> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Append an item at the tail.
    pub fn push_back(&mut self, item: I) {
        self.items.push_back(item);
    }

    /// Remove and return the head (the earliest arrival).
    pub fn pop_front(&mut self) -> Option<I> {
        self.items.pop_front()
    }

    /// 1-based rank of `key` in the line (1 = next to start). Linear in queue length.
    #[must_use]
    pub fn rank_of(&self, key: &str) -> Option<NonZeroUsize> {
        self.items
            .iter()
            .position(|item| item.key() == key)
            .and_then(|idx| NonZeroUsize::new(idx + 1))
    }

    /// Number of waiting items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<I: Keyed> Default for WaitingQueue<I> {
    fn default() -> Self {
        Self::new()
    }
}
