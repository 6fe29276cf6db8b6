use crate::config::CassandraClientConfig;
use crate::error::{CassandraClientError, CassandraClientResult};
use crate::options::DriverOptions;

/// Source of the configuration a session is built from
pub trait ConfigLoader: Send + Sync {
    /// The configuration captured when the loader was built
    fn initial_config(&self) -> &DriverOptions;

    /// Re-read the underlying sources. Returns `true` when the configuration
    /// changed as a result.
    fn reload(&self) -> CassandraClientResult<bool>;

    /// Whether [`ConfigLoader::reload`] can ever succeed
    fn supports_reloading(&self) -> bool;
}

/// Loader over a fixed, programmatically merged option set.
///
/// Built from the embedded driver reference defaults overlaid with explicit
/// [`CassandraClientConfig`] values. Its sources never change, so a reload is
/// a successful no-op.
pub struct ProgrammaticConfigLoader {
    options: DriverOptions,
}

impl ProgrammaticConfigLoader {
    /// Merge and validate configuration; fails before any connection attempt
    pub fn build(config: &CassandraClientConfig) -> CassandraClientResult<Self> {
        Ok(Self {
            options: DriverOptions::merged(config)?,
        })
    }
}

impl ConfigLoader for ProgrammaticConfigLoader {
    fn initial_config(&self) -> &DriverOptions {
        &self.options
    }

    fn reload(&self) -> CassandraClientResult<bool> {
        // fixed sources, nothing to re-read
        Ok(false)
    }

    fn supports_reloading(&self) -> bool {
        true
    }
}

/// Wrapper that pins configuration for the process lifetime.
///
/// Forwards everything to the delegate except `reload`, which always fails:
/// swapping configuration under live traffic is not supported, so any reload
/// attempt surfaces as [`CassandraClientError::UnsupportedOperation`].
pub struct NonReloadableConfigLoader<L: ConfigLoader> {
    delegate: L,
}

impl<L: ConfigLoader> NonReloadableConfigLoader<L> {
    pub fn new(delegate: L) -> Self {
        Self { delegate }
    }
}

impl<L: ConfigLoader> ConfigLoader for NonReloadableConfigLoader<L> {
    fn initial_config(&self) -> &DriverOptions {
        self.delegate.initial_config()
    }

    fn reload(&self) -> CassandraClientResult<bool> {
        Err(CassandraClientError::UnsupportedOperation(
            "configuration reload",
        ))
    }

    fn supports_reloading(&self) -> bool {
        false
    }
}
