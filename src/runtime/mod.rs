//! Runtime adapters and caller-facing API models.

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_spawner;

pub use api::{list_lanes, queue_position, snapshot, KeyState, LaneSummary, QueuePosition};
#[cfg(feature = "tokio-runtime")]
pub use tokio_spawner::TokioSpawner;
