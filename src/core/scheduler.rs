//! Bounded-concurrency, key-deduplicating scheduler.
//!
//! All bookkeeping (waiting queue, dedup table, active count) lives behind a
//! single `parking_lot::Mutex`. Critical sections are list push/pop, map
//! insert/erase and a counter bump; the lock is never held while work runs.
//!
//! Draining is self-triggering: every settle re-runs the drain pass, so a
//! freed slot is reused immediately without polling.

use std::fmt;
use std::future::Future;
use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::dedup::{DedupTable, Phase};
use super::waiting_queue::{Keyed, WaitingQueue};
use super::{KeyedWork, SchedulerError, Spawn};

/// `None` means the work panicked and never produced an outcome.
type SharedOutcome<T, E> = Shared<BoxFuture<'static, Option<Result<T, E>>>>;

type BoxedWork<T, E> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, E>> + Send>;

/// Shared completion handle for one key's unit of work.
///
/// Every caller that enqueues the same key while it is waiting or running
/// receives a clone of the same ticket. Awaiting it yields exactly the
/// outcome of the single execution the scheduler performed.
///
/// There is no built-in timeout. Racing a ticket against
/// `tokio::time::timeout` is fine, but giving up on the ticket does not free
/// the concurrency slot: the slot is released only when the work settles.
///
/// # Panics
///
/// Awaiting a ticket panics if the underlying work panicked, or if its
/// launched future was dropped before settling.
pub struct Ticket<T, E> {
    key: Arc<str>,
    shared: SharedOutcome<T, E>,
}

impl<T, E> Ticket<T, E> {
    /// Dedup key this ticket belongs to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T, E> Ticket<T, E>
where
    T: Clone,
    E: Clone,
{
    /// True if both tickets share the same unit of work.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.shared.ptr_eq(&other.shared)
    }
}

impl<T, E> Clone for Ticket<T, E>
where
    T: Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            shared: self.shared.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Ticket<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticket").field("key", &self.key).finish()
    }
}

impl<T, E> Future for Ticket<T, E>
where
    T: Clone,
    E: Clone,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match this.shared.poll_unpin(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(outcome)) => Poll::Ready(outcome),
            Poll::Ready(None) => panic!("work for key `{}` panicked before settling", this.key),
        }
    }
}

/// Where a key currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Neither waiting nor running.
    Untracked,
    /// Work is executing.
    Running,
    /// Waiting in line; 1 means next to start.
    Waiting(NonZeroUsize),
}

impl Position {
    /// Integer form: `-1` untracked, `0` running, `1..N` rank in line.
    #[must_use]
    pub fn rank(self) -> i64 {
        match self {
            Self::Untracked => -1,
            Self::Running => 0,
            Self::Waiting(rank) => i64::try_from(rank.get()).unwrap_or(i64::MAX),
        }
    }

    /// True unless untracked.
    #[must_use]
    pub const fn is_tracked(self) -> bool {
        !matches!(self, Self::Untracked)
    }
}

/// Point-in-time view of scheduler occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    /// Configured concurrency limit.
    pub concurrency_limit: usize,
    /// Items waiting for a slot.
    pub pending: usize,
    /// Items currently executing.
    pub active: usize,
}

struct WorkItem<T, E> {
    key: String,
    work: BoxedWork<T, E>,
    completion: oneshot::Sender<Result<T, E>>,
}

impl<T, E> Keyed for WorkItem<T, E> {
    fn key(&self) -> &str {
        &self.key
    }
}

struct State<T, E> {
    waiting: WaitingQueue<WorkItem<T, E>>,
    dedup: DedupTable<Ticket<T, E>>,
    active: usize,
}

struct Inner<T, E, S> {
    concurrency_limit: usize,
    state: Mutex<State<T, E>>,
    spawner: S,
}

/// Scheduler handle. Cloning is cheap and every clone drives the same state.
///
/// ```rust,ignore
/// use keyed_parking_lot::core::Scheduler;
///
/// let scheduler = Scheduler::<String, String, _>::new(2)?;
/// let ticket = scheduler.enqueue("fact-check:42", || async { check_quote(42).await })?;
/// println!("you are #{} in line", scheduler.position_of("fact-check:42").rank());
/// let verdict = ticket.await;
/// ```
pub struct Scheduler<T, E, S> {
    inner: Arc<Inner<T, E, S>>,
}

impl<T, E, S> Clone for Scheduler<T, E, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E, S> fmt::Debug for Scheduler<T, E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("Scheduler")
            .field("concurrency_limit", &snapshot.concurrency_limit)
            .field("pending", &snapshot.pending)
            .field("active", &snapshot.active)
            .finish()
    }
}

impl<T, E, S> Scheduler<T, E, S> {
    /// Configured concurrency limit.
    #[must_use]
    pub fn concurrency_limit(&self) -> usize {
        self.inner.concurrency_limit
    }

    /// Number of items waiting for a slot.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.state.lock().waiting.len()
    }

    /// Number of items currently executing.
    #[must_use]
    pub fn active(&self) -> usize {
        self.inner.state.lock().active
    }

    /// Limit, pending and active read under one lock.
    #[must_use]
    pub fn snapshot(&self) -> SchedulerSnapshot {
        let state = self.inner.state.lock();
        SchedulerSnapshot {
            concurrency_limit: self.inner.concurrency_limit,
            pending: state.waiting.len(),
            active: state.active,
        }
    }

    /// Where `key` stands: untracked, running, or its 1-based rank in line.
    #[must_use]
    pub fn position_of(&self, key: &str) -> Position {
        let state = self.inner.state.lock();
        match state.dedup.phase_of(key) {
            None => Position::Untracked,
            Some(Phase::Running) => Position::Running,
            Some(Phase::Waiting) => state
                .waiting
                .rank_of(key)
                .map_or(Position::Untracked, Position::Waiting),
        }
    }
}

impl<T, E, S> Scheduler<T, E, S>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    S: Spawn + Send + Sync + 'static,
{
    /// Create a scheduler that launches work through `spawner`.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConcurrencyLimit` if the limit is 0.
    pub fn with_spawner(concurrency_limit: usize, spawner: S) -> Result<Self, SchedulerError> {
        if concurrency_limit == 0 {
            return Err(SchedulerError::InvalidConcurrencyLimit(concurrency_limit));
        }
        Ok(Self {
            inner: Arc::new(Inner {
                concurrency_limit,
                state: Mutex::new(State {
                    waiting: WaitingQueue::new(),
                    dedup: DedupTable::new(),
                    active: 0,
                }),
                spawner,
            }),
        })
    }

    /// Accept `work` under `key`.
    ///
    /// If `key` is already waiting or running, the existing ticket is returned
    /// and `work` is dropped without being invoked. Otherwise the work joins
    /// the tail of the line and may start right away if a slot is free.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidKey` for an empty key.
    pub fn enqueue<K, F, Fut>(&self, key: K, work: F) -> Result<Ticket<T, E>, SchedulerError>
    where
        K: Into<String>,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let key = key.into();
        if key.is_empty() {
            return Err(SchedulerError::InvalidKey);
        }

        let ticket = {
            let mut state = self.inner.state.lock();
            if let Some(existing) = state.dedup.get(&key) {
                debug!(key = %key, "dedup hit, sharing existing ticket");
                return Ok(existing.clone());
            }

            let (completion, rx) = oneshot::channel();
            let ticket = Ticket {
                key: Arc::from(key.as_str()),
                shared: rx.map(Result::ok).boxed().shared(),
            };
            state.dedup.insert_waiting(key.clone(), ticket.clone());
            state.waiting.push_back(WorkItem {
                key,
                work: Box::new(move || work().boxed()),
                completion,
            });
            debug!(
                key = %ticket.key,
                pending = state.waiting.len(),
                active = state.active,
                "work enqueued"
            );
            ticket
        };

        self.inner.drain();
        Ok(ticket)
    }

    /// Accept a [`KeyedWork`] value, keyed by its own `dedup_key`.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidKey` if the work reports an empty key.
    pub fn submit<W>(&self, work: W) -> Result<Ticket<T, E>, SchedulerError>
    where
        W: KeyedWork<Output = T, Error = E>,
    {
        let key = work.dedup_key();
        self.enqueue(key, move || work.run())
    }
}

impl<T, E, S> Inner<T, E, S>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    S: Spawn + Send + Sync + 'static,
{
    /// Start waiting items until every slot is taken or the line is empty.
    fn drain(self: &Arc<Self>) {
        let launches = {
            let mut state = self.state.lock();
            let mut launches = Vec::new();
            while state.active < self.concurrency_limit {
                let Some(item) = state.waiting.pop_front() else {
                    break;
                };
                state.active += 1;
                state.dedup.mark_running(&item.key);
                let slot = SlotGuard {
                    inner: Arc::clone(self),
                    key: item.key.clone(),
                    released: false,
                };
                launches.push((item, slot));
            }
            launches
        };

        for (item, slot) in launches {
            debug!(key = %item.key, "launching work");
            self.spawner.spawn(Self::run(item, slot));
        }
    }

    /// Execute one item, then release its slot and key and re-drain.
    async fn run(item: WorkItem<T, E>, mut slot: SlotGuard<T, E, S>) {
        let WorkItem {
            key,
            work,
            completion,
        } = item;

        let outcome = AssertUnwindSafe(async move { work().await })
            .catch_unwind()
            .await;

        // Release bookkeeping before delivering, so a waiter that re-enqueues
        // this key on wake-up starts a fresh unit of work.
        let (active, pending) = slot.release();

        match outcome {
            Ok(result) => {
                debug!(key = %key, active, pending, "work settled");
                // All tickets may already be gone; nobody left to tell.
                let _ = completion.send(result);
            }
            Err(_) => {
                error!(key = %key, active, pending, "work panicked before settling");
                drop(completion);
            }
        }

        slot.inner.drain();
    }
}

/// Owns one occupied slot from launch until settle.
///
/// If the launched future is dropped without finishing (spawner discarded
/// it, runtime shut down, spawn panicked), dropping the guard still frees
/// the slot and the key.
struct SlotGuard<T, E, S>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    S: Spawn + Send + Sync + 'static,
{
    inner: Arc<Inner<T, E, S>>,
    key: String,
    released: bool,
}

impl<T, E, S> SlotGuard<T, E, S>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    S: Spawn + Send + Sync + 'static,
{
    /// Remove the dedup entry and free the slot. Returns `(active, pending)`.
    fn release(&mut self) -> (usize, usize) {
        self.released = true;
        let mut state = self.inner.state.lock();
        state.dedup.remove(&self.key);
        state.active -= 1;
        (state.active, state.waiting.len())
    }
}

impl<T, E, S> Drop for SlotGuard<T, E, S>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    S: Spawn + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let (active, pending) = self.release();
        warn!(key = %self.key, active, pending, "launched work dropped before settling");
        // Re-draining while unwinding could panic again inside the spawner.
        if !std::thread::panicking() {
            self.inner.drain();
        }
    }
}

#[cfg(feature = "tokio-runtime")]
impl<T, E> Scheduler<T, E, crate::runtime::TokioSpawner>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a scheduler that spawns work on the ambient tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConcurrencyLimit` if the limit is 0.
    pub fn new(concurrency_limit: usize) -> Result<Self, SchedulerError> {
        Self::with_spawner(concurrency_limit, crate::runtime::TokioSpawner::ambient())
    }
}

/// Scheduler driven by tokio.
#[cfg(feature = "tokio-runtime")]
pub type TokioScheduler<T, E> = Scheduler<T, E, crate::runtime::TokioSpawner>;
