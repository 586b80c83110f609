//! Error types for scheduler operations.
//!
//! Work failures are never represented here: a [`Ticket`](crate::core::Ticket)
//! resolves to the work's own `Result<T, E>` untouched.

use thiserror::Error;

/// Errors produced by the scheduler itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Concurrency limit must allow at least one running item.
    #[error("invalid concurrency limit: {0} (must be greater than 0)")]
    InvalidConcurrencyLimit(usize),
    /// Dedup keys must be non-empty.
    #[error("invalid dedup key: key must not be empty")]
    InvalidKey,
    /// Configuration could not be parsed or failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
