//! Runtime seam used to launch work.

use std::future::Future;

/// Abstraction for spawning work execution on a runtime.
///
/// The scheduler never blocks on work itself; it hands each launched item to
/// a `Spawn` implementation and keeps only bookkeeping on the caller's thread.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
