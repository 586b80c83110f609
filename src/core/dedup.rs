//! Dedup table: key to shared completion, covering both waiting and running phases.

use std::collections::HashMap;

/// Lifecycle phase of a tracked key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepted and sitting in the waiting queue.
    Waiting,
    /// Work has been launched and has not settled yet.
    Running,
}

/// One tracked key.
#[derive(Debug)]
pub struct DedupEntry<V> {
    /// Shared completion handed to every caller of this key.
    pub shared: V,
    /// Current phase.
    pub phase: Phase,
}

/// Map from dedup key to its shared completion. An entry lives from the
/// moment its work item is created until that item settles.
#[derive(Debug)]
pub struct DedupTable<V> {
    entries: HashMap<String, DedupEntry<V>>,
}

impl<V> DedupTable<V> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Look up the shared completion for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.shared)
    }

    /// Track a brand-new key in the waiting phase.
    pub fn insert_waiting(&mut self, key: String, shared: V) {
        let previous = self.entries.insert(
            key,
            DedupEntry {
                shared,
                phase: Phase::Waiting,
            },
        );
        debug_assert!(previous.is_none(), "key tracked twice");
    }

    /// Move a waiting key into the running phase.
    pub fn mark_running(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.phase = Phase::Running;
        }
    }

    /// Phase of `key`, if tracked.
    #[must_use]
    pub fn phase_of(&self, key: &str) -> Option<Phase> {
        self.entries.get(key).map(|entry| entry.phase)
    }

    /// Stop tracking `key`.
    pub fn remove(&mut self, key: &str) -> Option<DedupEntry<V>> {
        self.entries.remove(key)
    }

    /// Number of tracked keys (waiting + running).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no key is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for DedupTable<V> {
    fn default() -> Self {
        Self::new()
    }
}
