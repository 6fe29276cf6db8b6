use once_cell::sync::OnceCell;
use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::policies::load_balancing::DefaultPolicy;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::{error, info};

use crate::config::CassandraClientConfig;
use crate::error::{CassandraClientError, CassandraClientResult};
use crate::loader::{ConfigLoader, NonReloadableConfigLoader, ProgrammaticConfigLoader};
use crate::options::DriverOptions;
use crate::promise::Promise;
use crate::state::{SessionState, SessionStateView};

/// Shared session handle; the last clone dropped closes the session
pub type CassandraSession = Arc<Session>;

/// Promise over the one session this process bootstraps
pub type SessionHandle = Promise<CassandraSession>;

/// Builds the process-wide Cassandra session, eagerly or lazily.
///
/// One producer owns one session: repeated [`SessionProducer::produce`] calls
/// return the same handle. Configuration is merged and validated before any
/// asynchronous work starts, and the shared [`SessionState`] flips to
/// initialized only on genuine bootstrap success - never on failure.
///
/// # Example
///
/// ```ignore
/// use cassandra_client::{CassandraClientConfig, SessionProducer, SessionState};
///
/// let state = SessionState::not_initialized();
/// let producer = SessionProducer::new(
///     CassandraClientConfig::new(vec!["127.0.0.1:9042"]),
///     tokio::runtime::Handle::current(),
///     state,
/// );
///
/// // eager: suspends until the session is usable
/// let handle = producer.produce(true).await?;
/// let session = handle.try_get().expect("eager init always resolves first");
/// ```
pub struct SessionProducer {
    config: CassandraClientConfig,
    runtime: Handle,
    state: Arc<SessionState>,
    handle: OnceCell<SessionHandle>,
}

impl SessionProducer {
    pub fn new(config: CassandraClientConfig, runtime: Handle, state: Arc<SessionState>) -> Self {
        Self {
            config,
            runtime,
            state,
            handle: OnceCell::new(),
        }
    }

    /// Read-only view of the shared initialization state
    pub fn state_view(&self) -> SessionStateView {
        SessionStateView::new(self.state.clone())
    }

    /// Build the session and return its handle.
    ///
    /// With `eager == true` the call suspends until bootstrap completes and
    /// re-throws its failure. With `eager == false` the call returns
    /// immediately; bootstrap is driven by a task on the supplied runtime and
    /// failures surface through the handle on first use.
    pub async fn produce(&self, eager: bool) -> CassandraClientResult<SessionHandle> {
        if let Some(handle) = self.handle.get() {
            return Ok(handle.clone());
        }

        // Merge + validate before any asynchronous work; contradictory
        // settings never reach the network.
        let loader = NonReloadableConfigLoader::new(ProgrammaticConfigLoader::build(&self.config)?);
        let options = loader.initial_config().clone();
        let state = self.state.clone();

        let handle = self
            .handle
            .get_or_init(|| SessionHandle::new(bootstrap(options, state)))
            .clone();

        if eager {
            handle.get().await?;
        } else {
            let pending = handle.get_async();
            self.runtime.spawn(async move {
                if let Err(e) = pending.await {
                    error!("Cassandra session bootstrap failed: {e}");
                }
            });
        }

        Ok(handle)
    }
}

/// The one bootstrap this process runs. The state flip happens in here,
/// after the session answered its verification query and before the shared
/// promise resolves, so no observer can see one without the other.
async fn bootstrap(
    options: DriverOptions,
    state: Arc<SessionState>,
) -> Result<CassandraSession, Arc<CassandraClientError>> {
    let started = Instant::now();
    let session = build_session(&options).await.map_err(Arc::new)?;

    if options.metrics_session_enabled {
        metrics::counter!("cassandra_session_init_total").increment(1);
        metrics::histogram!("cassandra_session_init_seconds")
            .record(started.elapsed().as_secs_f64());
    }

    state.set_initialized();
    Ok(session)
}

async fn build_session(options: &DriverOptions) -> CassandraClientResult<CassandraSession> {
    let points: Vec<&str> = options.contact_points.iter().map(|s| s.as_str()).collect();
    info!("Attempting to connect to Cassandra at {:?}", points);

    let mut profile_builder = ExecutionProfile::builder()
        .consistency(options.consistency()?)
        .serial_consistency(Some(options.serial_consistency()?))
        .request_timeout(Some(Duration::from_millis(options.request_timeout_ms)));

    if let Some(ref datacenter) = options.local_datacenter {
        let policy = DefaultPolicy::builder()
            .prefer_datacenter(datacenter.clone())
            .build();
        profile_builder = profile_builder.load_balancing_policy(policy);
    }

    let mut builder = SessionBuilder::new()
        .known_nodes(&points)
        .connection_timeout(Duration::from_millis(options.connect_timeout_ms))
        .compression(options.compression()?)
        .default_execution_profile_handle(profile_builder.build().into_handle());

    if let (Some(username), Some(password)) = (&options.username, &options.password) {
        builder = builder.user(username, password);
    }
    if let Some(ref keyspace) = options.keyspace {
        builder = builder.use_keyspace(keyspace, true);
    }

    let session: Session = builder.build().await?;

    // The session must answer a query before anyone observes it as usable
    session
        .query_unpaged("SELECT release_version FROM system.local", &[])
        .await
        .map_err(|e| CassandraClientError::ConnectionFailed(e.to_string()))?;

    info!("Successfully connected to Cassandra");
    Ok(Arc::new(session))
}
