use scylla::frame::Compression;
use scylla::statement::{Consistency, SerialConsistency};
use serde::Deserialize;
use std::path::PathBuf;

use crate::config::CassandraClientConfig;
use crate::error::{CassandraClientError, CassandraClientResult};

/// Driver-native defaults, embedded as a resource.
///
/// This deliberately excludes the process environment: env vars are the host
/// configuration source and are consumed by [`CassandraClientConfig`], so
/// loading them here would apply them twice.
const REFERENCE: &str = include_str!("reference.json");

/// The merged option set a session is built from.
///
/// Produced by overlaying explicit [`CassandraClientConfig`] values on the
/// embedded reference defaults; explicit values always win. Immutable once
/// merged - see [`crate::loader::NonReloadableConfigLoader`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DriverOptions {
    pub contact_points: Vec<String>,
    #[serde(default)]
    pub local_datacenter: Option<String>,
    #[serde(default)]
    pub keyspace: Option<String>,
    #[serde(default)]
    pub secure_connect_bundle: Option<PathBuf>,
    pub resolve_contact_points: bool,
    pub reconnect_on_init: bool,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub consistency: String,
    pub serial_consistency: String,
    pub page_size: i32,
    pub default_idempotence: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub protocol_compression: String,
    pub metrics_node_enabled: bool,
    pub metrics_session_enabled: bool,
    #[serde(default)]
    pub graph_name: Option<String>,
    #[serde(default)]
    pub graph_read_consistency: Option<String>,
    #[serde(default)]
    pub graph_write_consistency: Option<String>,
    #[serde(default)]
    pub graph_timeout_ms: Option<u64>,
}

impl DriverOptions {
    /// Load the embedded driver defaults
    pub fn reference() -> CassandraClientResult<Self> {
        serde_json::from_str(REFERENCE).map_err(|e| {
            CassandraClientError::Configuration(format!("invalid driver reference defaults: {e}"))
        })
    }

    /// Merge the reference defaults with explicit configuration values.
    ///
    /// Fails fast with a [`CassandraClientError::Configuration`] on
    /// contradictory settings, before any connection attempt.
    pub fn merged(config: &CassandraClientConfig) -> CassandraClientResult<Self> {
        let mut options = Self::reference()?;
        options.apply(config)?;
        options.validate()?;
        Ok(options)
    }

    /// Overlay explicit configuration values; explicit values always win
    fn apply(&mut self, config: &CassandraClientConfig) -> CassandraClientResult<()> {
        if config.cloud.secure_connect_bundle.is_some() {
            if config.connection.contact_points.is_some() {
                return Err(CassandraClientError::Configuration(
                    "contact points and a secure connect bundle are mutually exclusive".into(),
                ));
            }
            return Err(CassandraClientError::Configuration(
                "cloud.secure-connect-bundle requires a cloud-capable driver build; \
                 connect via contact points instead"
                    .into(),
            ));
        }

        // connection settings
        if let Some(ref points) = config.connection.contact_points {
            self.contact_points = points.clone();
        }
        if let Some(ref datacenter) = config.connection.local_datacenter {
            self.local_datacenter = Some(datacenter.clone());
        }
        if let Some(ref keyspace) = config.connection.keyspace {
            self.keyspace = Some(keyspace.clone());
        }
        // init settings
        if let Some(resolve) = config.init.resolve_contact_points {
            self.resolve_contact_points = resolve;
        }
        if let Some(reconnect) = config.init.reconnect_on_init {
            self.reconnect_on_init = reconnect;
        }
        // request settings
        if let Some(timeout) = config.request.timeout_ms {
            self.request_timeout_ms = timeout;
        }
        if let Some(ref consistency) = config.request.consistency {
            self.consistency = consistency.clone();
        }
        if let Some(ref serial) = config.request.serial_consistency {
            self.serial_consistency = serial.clone();
        }
        if let Some(page_size) = config.request.page_size {
            self.page_size = page_size;
        }
        if let Some(idempotence) = config.request.default_idempotence {
            self.default_idempotence = idempotence;
        }
        // auth settings
        if let Some(ref username) = config.auth.username {
            self.username = Some(username.clone());
        }
        if let Some(ref password) = config.auth.password {
            self.password = Some(password.clone());
        }
        // graph settings
        if let Some(ref name) = config.graph.name {
            self.graph_name = Some(name.clone());
        }
        if let Some(ref read) = config.graph.read_consistency {
            self.graph_read_consistency = Some(read.clone());
        }
        if let Some(ref write) = config.graph.write_consistency {
            self.graph_write_consistency = Some(write.clone());
        }
        if let Some(timeout) = config.graph.timeout_ms {
            self.graph_timeout_ms = Some(timeout);
        }
        // metrics settings
        if let Some(enabled) = config.metrics.node_enabled {
            self.metrics_node_enabled = enabled;
        }
        if let Some(enabled) = config.metrics.session_enabled {
            self.metrics_session_enabled = enabled;
        }
        if let Some(ref compression) = config.protocol_compression {
            self.protocol_compression = compression.clone();
        }
        Ok(())
    }

    /// Check invariants the driver cannot express through types
    fn validate(&self) -> CassandraClientResult<()> {
        match (&self.username, &self.password) {
            (Some(_), None) => {
                return Err(CassandraClientError::Configuration(
                    "auth.username is set but auth.password is missing".into(),
                ));
            }
            (None, Some(_)) => {
                return Err(CassandraClientError::Configuration(
                    "auth.password is set but auth.username is missing".into(),
                ));
            }
            _ => {}
        }

        if self.contact_points.is_empty() {
            return Err(CassandraClientError::Configuration(
                "at least one contact point is required".into(),
            ));
        }

        self.consistency()?;
        self.serial_consistency()?;
        self.compression()?;
        if let Some(ref read) = self.graph_read_consistency {
            parse_consistency(read)?;
        }
        if let Some(ref write) = self.graph_write_consistency {
            parse_consistency(write)?;
        }
        Ok(())
    }

    /// Default consistency level as a driver type
    pub fn consistency(&self) -> CassandraClientResult<Consistency> {
        parse_consistency(&self.consistency)
    }

    /// Serial consistency level as a driver type
    pub fn serial_consistency(&self) -> CassandraClientResult<SerialConsistency> {
        match self.serial_consistency.to_ascii_uppercase().as_str() {
            "SERIAL" => Ok(SerialConsistency::Serial),
            "LOCAL_SERIAL" => Ok(SerialConsistency::LocalSerial),
            other => Err(CassandraClientError::Configuration(format!(
                "unknown serial consistency level '{other}'"
            ))),
        }
    }

    /// Protocol compression as a driver type; `None` means uncompressed
    pub fn compression(&self) -> CassandraClientResult<Option<Compression>> {
        match self.protocol_compression.to_ascii_lowercase().as_str() {
            "none" => Ok(None),
            "lz4" => Ok(Some(Compression::Lz4)),
            "snappy" => Ok(Some(Compression::Snappy)),
            other => Err(CassandraClientError::Configuration(format!(
                "unknown protocol compression '{other}'"
            ))),
        }
    }
}

pub(crate) fn parse_consistency(value: &str) -> CassandraClientResult<Consistency> {
    match value.to_ascii_uppercase().as_str() {
        "ANY" => Ok(Consistency::Any),
        "ONE" => Ok(Consistency::One),
        "TWO" => Ok(Consistency::Two),
        "THREE" => Ok(Consistency::Three),
        "QUORUM" => Ok(Consistency::Quorum),
        "ALL" => Ok(Consistency::All),
        "LOCAL_QUORUM" => Ok(Consistency::LocalQuorum),
        "EACH_QUORUM" => Ok(Consistency::EachQuorum),
        "LOCAL_ONE" => Ok(Consistency::LocalOne),
        other => Err(CassandraClientError::Configuration(format!(
            "unknown consistency level '{other}'"
        ))),
    }
}
