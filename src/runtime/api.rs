//! API-facing observability models for reporting queue state to callers.

use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::core::{Position, Scheduler, SchedulerSnapshot};

/// Coarse state of a key, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    /// Not waiting or running.
    Untracked,
    /// Executing.
    Running,
    /// Waiting for a slot.
    Waiting,
}

/// Queue position response ("you are #3 in line").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuePosition {
    /// Dedup key queried.
    pub key: String,
    /// `-1` untracked, `0` running, `1..N` rank in line.
    pub position: i64,
    /// Coarse state.
    pub state: KeyState,
}

impl QueuePosition {
    /// Build a response from a scheduler position.
    #[must_use]
    pub fn from_position(key: impl Into<String>, position: Position) -> Self {
        let state = match position {
            Position::Untracked => KeyState::Untracked,
            Position::Running => KeyState::Running,
            Position::Waiting(_) => KeyState::Waiting,
        };
        Self {
            key: key.into(),
            position: position.rank(),
            state,
        }
    }
}

/// Lane listing derived from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneSummary {
    /// Lane name.
    pub name: String,
    /// Configured concurrency limit.
    pub concurrency_limit: usize,
}

/// Report where `key` stands in `scheduler`.
#[must_use]
pub fn queue_position<T, E, S>(scheduler: &Scheduler<T, E, S>, key: &str) -> QueuePosition {
    QueuePosition::from_position(key, scheduler.position_of(key))
}

/// Occupancy snapshot of `scheduler`.
#[must_use]
pub fn snapshot<T, E, S>(scheduler: &Scheduler<T, E, S>) -> SchedulerSnapshot {
    scheduler.snapshot()
}

/// Build lane listings from config, sorted by name.
#[must_use]
pub fn list_lanes(cfg: &SchedulerConfig) -> Vec<LaneSummary> {
    let mut lanes: Vec<LaneSummary> = cfg
        .lanes
        .iter()
        .map(|(name, lane)| LaneSummary {
            name: name.clone(),
            concurrency_limit: lane.concurrency_limit,
        })
        .collect();
    lanes.sort_by(|a, b| a.name.cmp(&b.name));
    lanes
}
