use scylla::errors::NewSessionError;
use std::sync::Arc;

/// Error type for the Cassandra client extension
#[derive(Debug, thiserror::Error)]
pub enum CassandraClientError {
    /// Malformed or contradictory settings, detected before any network action
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Driver bootstrap failure, propagated verbatim
    #[error("Session bootstrap failed: {0}")]
    Connection(#[from] NewSessionError),

    /// The session came up but did not answer the verification query
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Bootstrap failure observed through the shared session promise
    #[error("Session bootstrap failed: {0}")]
    Bootstrap(Arc<CassandraClientError>),

    /// Operation disabled by this extension
    #[error("{0} is not supported: configuration is fixed for the process lifetime")]
    UnsupportedOperation(&'static str),
}

/// Result type alias for Cassandra client operations
pub type CassandraClientResult<T> = Result<T, CassandraClientError>;
