use scylla::client::session::Session;
use scylla::response::query_result::QueryResult;
use std::time::Instant;

/// Health check status for the session's cluster
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Error details when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
    /// Cassandra release version, when the probe returned one
    pub version: Option<String>,
}

/// Probe the session with a system-table query
pub async fn check_health(session: &Session) -> bool {
    session
        .query_unpaged("SELECT release_version FROM system.local", &[])
        .await
        .is_ok()
}

/// Probe the session and report latency, version and any error details
///
/// # Example
/// ```ignore
/// let status = check_health_detailed(&session).await;
/// if !status.healthy {
///     tracing::warn!("Cassandra unhealthy: {:?}", status.message);
/// }
/// ```
pub async fn check_health_detailed(session: &Session) -> HealthStatus {
    let start = Instant::now();
    let result = session
        .query_unpaged("SELECT release_version FROM system.local", &[])
        .await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(rows) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
            version: extract_version(rows),
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
            version: None,
        },
    }
}

fn extract_version(result: QueryResult) -> Option<String> {
    let rows_result = result.into_rows_result().ok()?;
    let mut rows = rows_result.rows::<(String,)>().ok()?;
    rows.next()?.ok().map(|(version,)| version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scylla::client::session_builder::SessionBuilder;

    async fn session() -> Session {
        SessionBuilder::new()
            .known_node("127.0.0.1:9042")
            .build()
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore] // Requires actual Cassandra
    async fn test_check_health() {
        assert!(check_health(&session().await).await);
    }

    #[tokio::test]
    #[ignore] // Requires actual Cassandra
    async fn test_check_health_detailed() {
        let status = check_health_detailed(&session().await).await;
        assert!(status.healthy);
        assert!(status.message.is_none());
        assert!(status.version.is_some());
    }
}
