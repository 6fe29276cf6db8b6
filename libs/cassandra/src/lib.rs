//! Cassandra client session extension
//!
//! Wires host configuration into the `scylla` driver and exposes the one
//! process-wide session through injectable handles: a direct handle, an
//! asynchronous promise handle, and a read-only initialization state. The
//! driver owns everything hard (protocol, pooling, retries, reconnection);
//! this crate only coordinates configuration merging and session bootstrap.
//!
//! # Eager initialization
//!
//! ```ignore
//! use cassandra_client::{init_session, CassandraClientConfig};
//!
//! let config = CassandraClientConfig::with_keyspace(vec!["127.0.0.1:9042"], "mykeyspace");
//! let handle = init_session(config, true).await?;
//!
//! // bootstrap already completed; the direct handle is available
//! let session = handle.try_get().expect("eager init");
//! session.query_unpaged("SELECT * FROM users", &[]).await?;
//! ```
//!
//! # Lazy initialization
//!
//! ```ignore
//! let handle = init_session(config, false).await?;
//! // startup continues; first use awaits bootstrap
//! let session = handle.get().await?;
//! ```
//!
//! # Looking up the published capabilities
//!
//! ```ignore
//! use cassandra_client::{registry, SessionHandle, SessionStateView};
//!
//! let state: SessionStateView = registry::global().get().unwrap();
//! if state.is_initialized() {
//!     let handle: SessionHandle = registry::global().get().unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod loader;
pub mod options;
pub mod producer;
pub mod promise;
pub mod registry;
pub mod state;

pub use config::CassandraClientConfig;
pub use error::{CassandraClientError, CassandraClientResult};
pub use producer::{CassandraSession, SessionHandle, SessionProducer};
pub use promise::Promise;
pub use state::{SessionState, SessionStateView};

// Re-export scylla types for convenience
pub use scylla::client::session::Session;
pub use scylla::client::session_builder::SessionBuilder;

/// Produce the process-wide session and publish its handles.
///
/// Called once at application startup. Merges configuration, bootstraps the
/// session eagerly or lazily on the current Tokio runtime, and publishes the
/// [`SessionHandle`] and [`SessionStateView`] in the global [`registry`].
/// Calling it again returns the already-published handle.
pub async fn init_session(
    config: CassandraClientConfig,
    eager: bool,
) -> CassandraClientResult<SessionHandle> {
    let registry = registry::global();
    if let Some(handle) = registry.get::<SessionHandle>() {
        return Ok(handle);
    }

    let state = SessionState::not_initialized();
    let producer = SessionProducer::new(config, tokio::runtime::Handle::current(), state);
    let view = producer.state_view();

    let handle = producer.produce(eager).await?;
    registry.put(view);
    registry.put(handle.clone());
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires actual Cassandra
    async fn test_init_session_publishes_capabilities() {
        let config = CassandraClientConfig::new(vec!["127.0.0.1:9042"]);
        let handle = init_session(config, true).await.unwrap();
        assert!(handle.try_get().is_some());

        let state: SessionStateView = registry::global().get().unwrap();
        assert!(state.is_initialized());

        let published: SessionHandle = registry::global().get().unwrap();
        assert!(published.ptr_eq(&handle));

        // a second call hands back the published session, not a new one
        let again = init_session(CassandraClientConfig::default(), true)
            .await
            .unwrap();
        assert!(again.ptr_eq(&handle));
    }
}
