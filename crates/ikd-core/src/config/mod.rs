//! Resolved configuration values consumed by the daemon core.
//!
//! Policy authoring and connection configuration live outside this core; by
//! the time values reach these types they are fully resolved. [`ChildConfig`]
//! is fixed at SA negotiation time and immutable for the SA's life.

mod error;

pub use error::ConfigError;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::rekey::RekeyPolicy;

/// Daemon runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Number of job worker threads.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Default log filter directive, overridable from the command line.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

const fn default_worker_threads() -> usize {
    16
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            log_filter: default_log_filter(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Resolved per-tunnel configuration attached to a child SA.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildConfig {
    /// When to rekey the tunnel.
    #[serde(default)]
    pub rekey_policy: RekeyPolicy,

    /// Soft lifetime after which a rekey is triggered.
    #[serde(default = "default_soft_lifetime")]
    #[serde(with = "humantime_serde")]
    pub soft_lifetime: Duration,

    /// Maximum random amount subtracted from the soft lifetime so rekeys of
    /// SAs negotiated together do not collide.
    #[serde(default = "default_rekey_jitter")]
    #[serde(with = "humantime_serde")]
    pub rekey_jitter: Duration,
}

const fn default_soft_lifetime() -> Duration {
    Duration::from_secs(3600)
}

const fn default_rekey_jitter() -> Duration {
    Duration::from_secs(360)
}

impl Default for ChildConfig {
    fn default() -> Self {
        Self {
            rekey_policy: RekeyPolicy::default(),
            soft_lifetime: default_soft_lifetime(),
            rekey_jitter: default_rekey_jitter(),
        }
    }
}
