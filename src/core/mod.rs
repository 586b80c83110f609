//! Core scheduling: the keyed scheduler, its queue and dedup table.

pub mod dedup;
pub mod error;
pub mod scheduler;
pub mod spawn;
pub mod waiting_queue;
pub mod work;

pub use error::SchedulerError;
pub use scheduler::{Position, Scheduler, SchedulerSnapshot, Ticket};
#[cfg(feature = "tokio-runtime")]
pub use scheduler::TokioScheduler;
pub use spawn::Spawn;
pub use work::KeyedWork;
