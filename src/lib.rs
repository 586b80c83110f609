//! # Keyed Parking Lot
//!
//! A bounded-concurrency, key-deduplicating task scheduler for throttling calls
//! into rate-limited AI services.
//!
//! Many independent callers may ask for the same expensive unit of work at the
//! same time ("fact-check quote #42"). The scheduler parks work in a FIFO line
//! when every slot is taken, and wakes it the moment a slot frees up.
//!
//! ## Guarantees
//!
//! - **Bounded concurrency**: at most `concurrency_limit` work items execute at once
//! - **Key deduplication**: a key that is waiting *or* running is never scheduled
//!   twice; duplicate callers share one [`Ticket`](core::Ticket) and one outcome
//! - **FIFO start order**: waiting items start strictly in arrival order
//! - **Failure isolation**: a failing (or panicking) item releases its slot and
//!   key exactly like a successful one and never blocks the rest of the line
//! - **Pass-through outcomes**: the ticket resolves to the work's own `Result<T, E>`
//!
//! No persistence, retries, priorities, or timeouts: those belong to the caller.
//!
//! ## Example
//!
//! ```rust,ignore
//! use keyed_parking_lot::core::Scheduler;
//!
//! let scheduler = Scheduler::<String, String, _>::new(2)?;
//!
//! let first = scheduler.enqueue("fact-check:42", || async { fact_check(42).await })?;
//! // Same key while pending or running: same ticket, closure never invoked.
//! let second = scheduler.enqueue("fact-check:42", || async { fact_check(42).await })?;
//! assert!(first.ptr_eq(&second));
//!
//! println!("position: {}", scheduler.position_of("fact-check:42").rank());
//! let verdict = first.await;
//! ```
//!
//! For complete examples, see `tests/scheduler_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling: the keyed scheduler, its queue and dedup table.
pub mod core;
/// Configuration models for scheduler lanes.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Runtime adapters and caller-facing API models.
pub mod runtime;
/// Shared utilities.
pub mod util;
