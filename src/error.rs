//! Error types for treesync.
//!
//! Per-entry filesystem failures are reported as [`SyncError::IoError`] or
//! [`SyncError::AccessError`] and never unwind past the file or directory
//! that produced them.

use std::path::{Path, PathBuf};

/// Unified error type for configuration, reconciliation and scheduling.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Missing or invalid configuration. Fatal at startup.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A filesystem operation failed for one entry.
    #[error("Failed to {op} {}: {source}", path.display())]
    IoError {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Permission denied for one entry (or for the log destination).
    #[error("Access denied while trying to {op} {}: {source}", path.display())]
    AccessError {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The operation was not started because the pass was cancelled.
    #[error("Operation cancelled")]
    Cancelled,

    /// Invalid scheduler state transition.
    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

impl SyncError {
    /// Wrap an I/O error for `op` on `path`, classifying permission failures.
    pub fn io(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            SyncError::AccessError {
                op,
                path: path.to_path_buf(),
                source,
            }
        } else {
            SyncError::IoError {
                op,
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Whether this error is an access (permission) failure.
    pub fn is_access(&self) -> bool {
        matches!(self, SyncError::AccessError { .. })
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::ConfigError(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type SyncResult<T> = Result<T, SyncError>;
