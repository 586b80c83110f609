//! Work abstraction for callers that model a unit of work as a value.

use async_trait::async_trait;

/// A self-describing unit of work: it knows its own dedup key and how to run.
///
/// Closures passed to [`Scheduler::enqueue`](crate::core::Scheduler::enqueue)
/// cover the common case; implement this trait when the request already is a
/// typed value and the key derives from it.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use keyed_parking_lot::core::KeyedWork;
///
/// struct FactCheck {
///     quote_id: u64,
/// }
///
/// #[async_trait]
/// impl KeyedWork for FactCheck {
///     type Output = String;
///     type Error = String;
///
///     fn dedup_key(&self) -> String {
///         format!("fact-check:{}", self.quote_id)
///     }
///
///     async fn run(self) -> Result<String, String> {
///         call_model(self.quote_id).await
///     }
/// }
///
/// let verdict = scheduler.submit(FactCheck { quote_id: 42 })?.await;
/// ```
#[async_trait]
pub trait KeyedWork: Send + Sized + 'static {
    /// Value produced on success.
    type Output;
    /// Error produced on failure; handed to every waiter untouched.
    type Error;

    /// Key under which duplicate submissions collapse into one execution.
    fn dedup_key(&self) -> String;

    /// Perform the work. Invoked at most once per accepted key lifecycle.
    async fn run(self) -> Result<Self::Output, Self::Error>;
}
