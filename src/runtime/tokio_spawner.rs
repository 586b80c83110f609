//! Tokio runtime spawner implementation.

use std::future::Future;
use std::sync::Arc;

use crate::core::Spawn;

/// Tokio-based spawner that executes work on a tokio runtime.
#[derive(Clone, Debug, Default)]
pub struct TokioSpawner {
    /// `None` spawns on whichever runtime is current at spawn time.
    handle: Option<Arc<tokio::runtime::Handle>>,
}

impl TokioSpawner {
    /// Create a `TokioSpawner` bound to a specific runtime handle.
    #[must_use]
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle: Some(Arc::new(handle)),
        }
    }

    /// Create a `TokioSpawner` that uses the runtime current at spawn time.
    ///
    /// Spawning outside a runtime context panics, as `tokio::spawn` does.
    #[must_use]
    pub const fn ambient() -> Self {
        Self { handle: None }
    }

    /// Create a `TokioSpawner` bound to the runtime of the calling context.
    ///
    /// # Errors
    ///
    /// Fails when called outside a tokio runtime.
    pub fn try_current() -> Result<Self, tokio::runtime::TryCurrentError> {
        tokio::runtime::Handle::try_current().map(Self::new)
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match &self.handle {
            Some(handle) => {
                handle.spawn(fut);
            }
            None => {
                tokio::spawn(fut);
            }
        }
    }
}
