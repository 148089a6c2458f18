//! Validation of loaded configuration into daemon-ready settings.

use super::paths::{normalize, resolve_log_file_path};
use super::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::logging::LoggingConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Validated configuration with absolute paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub source: PathBuf,
    pub replica: PathBuf,
    pub interval: Duration,
    pub log_file: PathBuf,
    pub max_concurrent_ops: usize,
    pub logging: LoggingConfig,
    /// Non-fatal findings, reported once logging is installed
    pub warnings: Vec<String>,
}

fn config_error(message: impl Into<String>) -> SyncError {
    SyncError::ConfigError(message.into())
}

impl SyncConfig {
    /// Check the configuration and resolve every path.
    pub fn resolve(&self) -> SyncResult<ResolvedConfig> {
        if self.source.as_os_str().is_empty() {
            return Err(config_error("source path is not set"));
        }
        if self.replica.as_os_str().is_empty() {
            return Err(config_error("replica path is not set"));
        }
        if self.interval_secs == 0 {
            return Err(config_error("interval_secs must be a positive integer"));
        }
        if self.max_concurrent_ops == 0 {
            return Err(config_error("max_concurrent_ops must be at least 1"));
        }

        if !self.source.exists() {
            return Err(config_error(format!(
                "source directory does not exist: {}",
                self.source.display()
            )));
        }
        if !self.source.is_dir() {
            return Err(config_error(format!(
                "source path is not a directory: {}",
                self.source.display()
            )));
        }
        std::fs::read_dir(&self.source).map_err(|e| {
            config_error(format!(
                "source directory is not readable: {}: {}",
                self.source.display(),
                e
            ))
        })?;

        let source = normalize(&self.source)?;
        let replica = normalize(&self.replica)?;
        if source == replica {
            return Err(config_error("source and replica are the same directory"));
        }
        if replica.starts_with(&source) {
            return Err(config_error(format!(
                "replica {} is inside source {}",
                replica.display(),
                source.display()
            )));
        }
        if source.starts_with(&replica) {
            return Err(config_error(format!(
                "source {} is inside replica {}",
                source.display(),
                replica.display()
            )));
        }

        let log_file = normalize(&resolve_log_file_path(&self.log_path)?)?;
        if log_file.starts_with(&replica) {
            return Err(config_error(format!(
                "log file {} is inside the replica and would be deleted by every pass",
                log_file.display()
            )));
        }
        let mut warnings = Vec::new();
        if log_file.starts_with(&source) {
            warnings.push(format!(
                "log file {} is inside the source tree and will be mirrored on every pass",
                log_file.display()
            ));
        }

        Ok(ResolvedConfig {
            source,
            replica,
            interval: Duration::from_secs(self.interval_secs),
            log_file,
            max_concurrent_ops: self.max_concurrent_ops,
            logging: self.logging.clone(),
            warnings,
        })
    }
}
