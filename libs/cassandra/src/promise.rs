use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::future::Future;
use std::sync::Arc;

use crate::error::{CassandraClientError, CassandraClientResult};

/// Result carried by the shared future. Shared futures hand a clone of the
/// output to every observer, so the failure side must be cloneable.
type SharedResult<T> = Result<T, Arc<CassandraClientError>>;

/// Single-resolution promise: resolve once, observe many.
///
/// Wraps an asynchronous computation so that any number of holders can await
/// or poll its one result. Every successful observation yields a clone of the
/// same value, never a freshly constructed one. The promise itself never
/// retries and never times out; both belong to the caller or to the layer
/// that produced the wrapped future.
///
/// # Example
///
/// ```ignore
/// let handle = producer.produce(false).await?;
///
/// // non-blocking: Some(_) only once bootstrap has completed
/// if let Some(session) = handle.try_get() { /* ... */ }
///
/// // composable: chain with standard future combinators
/// use futures::FutureExt;
/// let keyspace = handle
///     .get_async()
///     .map(|r| r.map(|s| s.get_keyspace()))
///     .await?;
/// ```
pub struct Promise<T: Clone> {
    inner: Shared<BoxFuture<'static, SharedResult<T>>>,
}

impl<T: Clone> std::fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Promise").finish_non_exhaustive()
    }
}

impl<T: Clone> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Promise<T> {
    pub(crate) fn new<F>(fut: F) -> Self
    where
        F: Future<Output = SharedResult<T>> + Send + 'static,
    {
        Self {
            inner: fut.boxed().shared(),
        }
    }

    /// Direct, non-blocking access: `Some(value)` iff already resolved
    /// successfully. Never starts or waits for the computation.
    pub fn try_get(&self) -> Option<T> {
        match self.inner.peek() {
            Some(Ok(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Whether the promise has resolved, successfully or not
    pub fn is_resolved(&self) -> bool {
        self.inner.peek().is_some()
    }

    /// Await the result
    pub async fn get(&self) -> CassandraClientResult<T> {
        self.get_async().await
    }

    /// A future resolving exactly when the wrapped computation resolves.
    /// Detached from `self`, so it can be spawned or chained freely.
    pub fn get_async(&self) -> impl Future<Output = CassandraClientResult<T>> + Send + 'static {
        self.inner
            .clone()
            .map(|result| result.map_err(CassandraClientError::Bootstrap))
    }

    /// Whether two promises share the same underlying computation
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    fn resolved(value: u32) -> Promise<Arc<u32>> {
        Promise::new(async move { Ok(Arc::new(value)) })
    }

    #[tokio::test]
    async fn test_promise_resolves_value() {
        let promise = resolved(42);
        assert_eq!(*promise.get().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_try_get_pending_then_resolved() {
        let (tx, rx) = oneshot::channel::<u32>();
        let promise: Promise<Arc<u32>> = Promise::new(async move {
            let value = rx.await.expect("sender dropped");
            Ok(Arc::new(value))
        });

        assert!(promise.try_get().is_none());
        assert!(!promise.is_resolved());

        tx.send(7).unwrap();
        assert_eq!(*promise.get().await.unwrap(), 7);
        assert!(promise.is_resolved());
        assert_eq!(*promise.try_get().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_resolving_twice_returns_same_instance() {
        let promise = resolved(1);
        let first = promise.get().await.unwrap();
        let second = promise.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let direct = promise.try_get().unwrap();
        assert!(Arc::ptr_eq(&first, &direct));
    }

    #[tokio::test]
    async fn test_clones_observe_the_same_resolution() {
        let promise = resolved(9);
        let clone = promise.clone();
        assert!(promise.ptr_eq(&clone));

        let from_original = promise.get().await.unwrap();
        let from_clone = clone.get().await.unwrap();
        assert!(Arc::ptr_eq(&from_original, &from_clone));
    }

    #[tokio::test]
    async fn test_failure_propagates_to_every_observer() {
        let promise: Promise<Arc<u32>> = Promise::new(async {
            Err(Arc::new(CassandraClientError::Configuration(
                "bad settings".into(),
            )))
        });

        let err = promise.get().await.unwrap_err();
        assert!(matches!(err, CassandraClientError::Bootstrap(_)));
        assert!(err.to_string().contains("bad settings"));

        // resolved, but not successfully
        assert!(promise.is_resolved());
        assert!(promise.try_get().is_none());

        // second observation sees the same failure
        let err = promise.get().await.unwrap_err();
        assert!(matches!(err, CassandraClientError::Bootstrap(_)));
    }

    #[tokio::test]
    async fn test_composes_with_future_combinators() {
        let promise = resolved(10);
        let doubled = promise
            .get_async()
            .map(|result| result.map(|v| *v * 2))
            .await
            .unwrap();
        assert_eq!(doubled, 20);
    }
}
