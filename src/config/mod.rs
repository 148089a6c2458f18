//! Configuration
//!
//! Layered configuration for the sync daemon. Sources, lowest precedence
//! first: built-in defaults, an optional TOML file, `TREESYNC_*` environment
//! variables, then command-line overrides.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod validation;

pub use facade::ConfigLoader;
pub use validation::ResolvedConfig;

use crate::logging::LoggingConfig;
use crate::sync::DEFAULT_MAX_CONCURRENT_OPS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default seconds between passes
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_max_concurrent_ops() -> usize {
    DEFAULT_MAX_CONCURRENT_OPS
}

/// Raw configuration as loaded from all sources, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Directory mirrored from
    #[serde(default)]
    pub source: PathBuf,

    /// Directory kept identical to `source` (created if absent)
    #[serde(default)]
    pub replica: PathBuf,

    /// Seconds between passes
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Audit log directory or file; empty means the platform default
    #[serde(default)]
    pub log_path: PathBuf,

    /// Cap on concurrently open file operations within a pass
    #[serde(default = "default_max_concurrent_ops")]
    pub max_concurrent_ops: usize,

    /// Console diagnostics
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            replica: PathBuf::new(),
            interval_secs: default_interval_secs(),
            log_path: PathBuf::new(),
            max_concurrent_ops: default_max_concurrent_ops(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Values supplied on the command line; `None` leaves lower layers in effect.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source: Option<PathBuf>,
    pub replica: Option<PathBuf>,
    pub interval_secs: Option<u64>,
    pub log_path: Option<PathBuf>,
    pub max_concurrent_ops: Option<usize>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}
