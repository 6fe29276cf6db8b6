use core_config::{env_opt, env_parse_opt, env_required, ConfigError, FromEnv};
use std::path::PathBuf;

/// Connection settings (contact points, datacenter, keyspace)
#[derive(Clone, Debug, Default)]
pub struct ConnectionConfig {
    /// Contact points (host:port pairs)
    /// Example: ["127.0.0.1:9042", "127.0.0.2:9042"]
    pub contact_points: Option<Vec<String>>,

    /// Local datacenter for DC-aware load balancing
    pub local_datacenter: Option<String>,

    /// Keyspace to use as the session default
    pub keyspace: Option<String>,
}

/// Cloud settings
#[derive(Clone, Debug, Default)]
pub struct CloudConfig {
    /// Path to a secure connect bundle; mutually exclusive with contact points
    pub secure_connect_bundle: Option<PathBuf>,
}

/// Session initialization settings
#[derive(Clone, Debug, Default)]
pub struct InitConfig {
    /// Whether contact point hostnames are resolved eagerly
    pub resolve_contact_points: Option<bool>,

    /// Whether to keep reconnecting if no contact point is reachable at startup
    pub reconnect_on_init: Option<bool>,
}

/// Request defaults applied to the session's default execution profile
#[derive(Clone, Debug, Default)]
pub struct RequestConfig {
    /// Request timeout in milliseconds
    pub timeout_ms: Option<u64>,

    /// Consistency level, e.g. "LOCAL_QUORUM"
    pub consistency: Option<String>,

    /// Serial consistency level, "SERIAL" or "LOCAL_SERIAL"
    pub serial_consistency: Option<String>,

    /// Page size for paged reads
    pub page_size: Option<i32>,

    /// Whether requests are considered idempotent unless stated otherwise
    pub default_idempotence: Option<bool>,
}

/// Authentication credentials. Both fields must be set together or not at all;
/// setting exactly one is a configuration error at merge time.
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Graph settings, forwarded for graph-capable backends
#[derive(Clone, Debug, Default)]
pub struct GraphConfig {
    pub name: Option<String>,
    pub read_consistency: Option<String>,
    pub write_consistency: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// Driver metrics toggles
#[derive(Clone, Debug, Default)]
pub struct MetricsConfig {
    pub node_enabled: Option<bool>,
    pub session_enabled: Option<bool>,
}

/// Cassandra client configuration
///
/// Holds the host-side settings that overlay the driver's native defaults.
/// Every field is optional; unset fields keep the driver default. It can be
/// constructed manually or loaded from environment variables.
///
/// # Example
///
/// ```ignore
/// use cassandra_client::CassandraClientConfig;
///
/// // Manual construction
/// let config = CassandraClientConfig::new(vec!["127.0.0.1:9042"]);
///
/// // With keyspace and credentials
/// let config = CassandraClientConfig::with_keyspace(vec!["127.0.0.1:9042"], "mykeyspace")
///     .with_credentials("user", "password");
///
/// // From environment variables
/// use core_config::FromEnv;
/// let config = CassandraClientConfig::from_env()?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct CassandraClientConfig {
    pub connection: ConnectionConfig,
    pub cloud: CloudConfig,
    pub init: InitConfig,
    pub request: RequestConfig,
    pub auth: AuthConfig,
    pub graph: GraphConfig,
    pub metrics: MetricsConfig,

    /// Protocol compression: "none", "lz4" or "snappy"
    pub protocol_compression: Option<String>,
}

impl CassandraClientConfig {
    /// Create a configuration with explicit contact points
    pub fn new<S: Into<String>>(contact_points: Vec<S>) -> Self {
        Self {
            connection: ConnectionConfig {
                contact_points: Some(contact_points.into_iter().map(|s| s.into()).collect()),
                ..ConnectionConfig::default()
            },
            ..Self::default()
        }
    }

    /// Create a configuration with contact points and a default keyspace
    pub fn with_keyspace<S: Into<String>>(
        contact_points: Vec<S>,
        keyspace: impl Into<String>,
    ) -> Self {
        let mut config = Self::new(contact_points);
        config.connection.keyspace = Some(keyspace.into());
        config
    }

    /// Set the local datacenter for DC-aware load balancing
    pub fn with_datacenter(mut self, datacenter: impl Into<String>) -> Self {
        self.connection.local_datacenter = Some(datacenter.into());
        self
    }

    /// Set authentication credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth.username = Some(username.into());
        self.auth.password = Some(password.into());
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request.timeout_ms = Some(timeout_ms);
        self
    }

    /// Set the default consistency level
    pub fn with_consistency(mut self, consistency: impl Into<String>) -> Self {
        self.request.consistency = Some(consistency.into());
        self
    }

    /// Set the protocol compression ("none", "lz4" or "snappy")
    pub fn with_compression(mut self, compression: impl Into<String>) -> Self {
        self.protocol_compression = Some(compression.into());
        self
    }

    /// Enable or disable session-level driver metrics
    pub fn with_session_metrics(mut self, enabled: bool) -> Self {
        self.metrics.session_enabled = Some(enabled);
        self
    }
}

/// Load the client configuration from environment variables
///
/// Environment variables:
/// - `CASSANDRA_CONTACT_POINTS` (required) - Comma-separated host:port pairs
/// - `CASSANDRA_LOCAL_DATACENTER` (optional)
/// - `CASSANDRA_KEYSPACE` (optional)
/// - `CASSANDRA_SECURE_CONNECT_BUNDLE` (optional) - Path to a cloud bundle
/// - `CASSANDRA_RESOLVE_CONTACT_POINTS` (optional, bool)
/// - `CASSANDRA_RECONNECT_ON_INIT` (optional, bool)
/// - `CASSANDRA_REQUEST_TIMEOUT_MS` (optional)
/// - `CASSANDRA_CONSISTENCY` (optional, e.g. "LOCAL_QUORUM")
/// - `CASSANDRA_SERIAL_CONSISTENCY` (optional, "SERIAL" or "LOCAL_SERIAL")
/// - `CASSANDRA_PAGE_SIZE` (optional)
/// - `CASSANDRA_DEFAULT_IDEMPOTENCE` (optional, bool)
/// - `CASSANDRA_USERNAME` / `CASSANDRA_PASSWORD` (optional pair)
/// - `CASSANDRA_COMPRESSION` (optional, "none"|"lz4"|"snappy")
/// - `CASSANDRA_METRICS_NODE_ENABLED` (optional, bool)
/// - `CASSANDRA_METRICS_SESSION_ENABLED` (optional, bool)
/// - `CASSANDRA_GRAPH_NAME` (optional)
/// - `CASSANDRA_GRAPH_READ_CONSISTENCY` (optional)
/// - `CASSANDRA_GRAPH_WRITE_CONSISTENCY` (optional)
/// - `CASSANDRA_GRAPH_TIMEOUT_MS` (optional)
impl FromEnv for CassandraClientConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let contact_points_str = env_required("CASSANDRA_CONTACT_POINTS")?;

        let contact_points: Vec<String> = contact_points_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if contact_points.is_empty() {
            return Err(ConfigError::ParseError {
                key: "CASSANDRA_CONTACT_POINTS".to_string(),
                details: "No valid contact points provided".to_string(),
            });
        }

        Ok(Self {
            connection: ConnectionConfig {
                contact_points: Some(contact_points),
                local_datacenter: env_opt("CASSANDRA_LOCAL_DATACENTER"),
                keyspace: env_opt("CASSANDRA_KEYSPACE"),
            },
            cloud: CloudConfig {
                secure_connect_bundle: env_opt("CASSANDRA_SECURE_CONNECT_BUNDLE")
                    .map(PathBuf::from),
            },
            init: InitConfig {
                resolve_contact_points: env_parse_opt("CASSANDRA_RESOLVE_CONTACT_POINTS")?,
                reconnect_on_init: env_parse_opt("CASSANDRA_RECONNECT_ON_INIT")?,
            },
            request: RequestConfig {
                timeout_ms: env_parse_opt("CASSANDRA_REQUEST_TIMEOUT_MS")?,
                consistency: env_opt("CASSANDRA_CONSISTENCY"),
                serial_consistency: env_opt("CASSANDRA_SERIAL_CONSISTENCY"),
                page_size: env_parse_opt("CASSANDRA_PAGE_SIZE")?,
                default_idempotence: env_parse_opt("CASSANDRA_DEFAULT_IDEMPOTENCE")?,
            },
            auth: AuthConfig {
                username: env_opt("CASSANDRA_USERNAME"),
                password: env_opt("CASSANDRA_PASSWORD"),
            },
            graph: GraphConfig {
                name: env_opt("CASSANDRA_GRAPH_NAME"),
                read_consistency: env_opt("CASSANDRA_GRAPH_READ_CONSISTENCY"),
                write_consistency: env_opt("CASSANDRA_GRAPH_WRITE_CONSISTENCY"),
                timeout_ms: env_parse_opt("CASSANDRA_GRAPH_TIMEOUT_MS")?,
            },
            metrics: MetricsConfig {
                node_enabled: env_parse_opt("CASSANDRA_METRICS_NODE_ENABLED")?,
                session_enabled: env_parse_opt("CASSANDRA_METRICS_SESSION_ENABLED")?,
            },
            protocol_compression: env_opt("CASSANDRA_COMPRESSION"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = CassandraClientConfig::new(vec!["127.0.0.1:9042"]);
        assert_eq!(
            config.connection.contact_points,
            Some(vec!["127.0.0.1:9042".to_string()])
        );
        assert!(config.connection.keyspace.is_none());
        assert!(config.auth.username.is_none());
    }

    #[test]
    fn test_config_with_keyspace() {
        let config = CassandraClientConfig::with_keyspace(vec!["127.0.0.1:9042"], "mykeyspace");
        assert_eq!(config.connection.keyspace, Some("mykeyspace".to_string()));
    }

    #[test]
    fn test_config_builder_pattern() {
        let config = CassandraClientConfig::new(vec!["127.0.0.1:9042"])
            .with_datacenter("dc1")
            .with_credentials("user", "pass")
            .with_request_timeout_ms(1500)
            .with_consistency("LOCAL_QUORUM")
            .with_compression("lz4")
            .with_session_metrics(true);

        assert_eq!(config.connection.local_datacenter, Some("dc1".to_string()));
        assert_eq!(config.auth.username, Some("user".to_string()));
        assert_eq!(config.auth.password, Some("pass".to_string()));
        assert_eq!(config.request.timeout_ms, Some(1500));
        assert_eq!(config.request.consistency, Some("LOCAL_QUORUM".to_string()));
        assert_eq!(config.protocol_compression, Some("lz4".to_string()));
        assert_eq!(config.metrics.session_enabled, Some(true));
    }

    #[test]
    fn test_config_default_is_empty() {
        let config = CassandraClientConfig::default();
        assert!(config.connection.contact_points.is_none());
        assert!(config.request.consistency.is_none());
        assert!(config.protocol_compression.is_none());
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                (
                    "CASSANDRA_CONTACT_POINTS",
                    Some("127.0.0.1:9042, 127.0.0.2:9042"),
                ),
                ("CASSANDRA_KEYSPACE", Some("testkeyspace")),
                ("CASSANDRA_REQUEST_TIMEOUT_MS", Some("2500")),
                ("CASSANDRA_DEFAULT_IDEMPOTENCE", Some("true")),
            ],
            || {
                let config = CassandraClientConfig::from_env().unwrap();
                assert_eq!(config.connection.contact_points.as_ref().unwrap().len(), 2);
                assert_eq!(
                    config.connection.contact_points.as_ref().unwrap()[1],
                    "127.0.0.2:9042"
                );
                assert_eq!(config.connection.keyspace, Some("testkeyspace".to_string()));
                assert_eq!(config.request.timeout_ms, Some(2500));
                assert_eq!(config.request.default_idempotence, Some(true));
            },
        );
    }

    #[test]
    fn test_config_from_env_missing_contact_points() {
        temp_env::with_var_unset("CASSANDRA_CONTACT_POINTS", || {
            assert!(CassandraClientConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_config_from_env_empty_contact_points() {
        temp_env::with_var("CASSANDRA_CONTACT_POINTS", Some(" , "), || {
            assert!(CassandraClientConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_config_from_env_bad_bool() {
        temp_env::with_vars(
            [
                ("CASSANDRA_CONTACT_POINTS", Some("127.0.0.1:9042")),
                ("CASSANDRA_RECONNECT_ON_INIT", Some("yes")),
            ],
            || {
                let err = CassandraClientConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("CASSANDRA_RECONNECT_ON_INIT"));
            },
        );
    }
}
