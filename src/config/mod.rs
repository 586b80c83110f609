//! Configuration models for scheduler lanes.

pub mod lane;

pub use lane::{LaneConfig, SchedulerConfig, CONCURRENCY_LIMIT_ENV_SUFFIX};
