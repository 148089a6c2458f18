//! Audit log file location and path normalization.

use crate::error::{SyncError, SyncResult};
use crate::types::LOG_FILE_NAME;
use std::path::{Path, PathBuf};

/// Resolve the configured log path to the file that receives audit records.
///
/// An empty path selects the platform default. An existing directory, or a
/// path with no extension, is treated as a directory and gets
/// [`LOG_FILE_NAME`] appended. Anything else is the log file itself.
pub fn resolve_log_file_path(configured: &Path) -> SyncResult<PathBuf> {
    if configured.as_os_str().is_empty() {
        return default_log_file_path();
    }
    if configured.is_dir() {
        return Ok(configured.join(LOG_FILE_NAME));
    }
    if configured.is_file() || configured.extension().is_some() {
        return Ok(configured.to_path_buf());
    }
    Ok(configured.join(LOG_FILE_NAME))
}

/// Default log file in the platform state directory (data directory where no
/// state directory exists).
pub fn default_log_file_path() -> SyncResult<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "treesync", "treesync").ok_or_else(|| {
        SyncError::ConfigError(
            "Could not determine platform directories for the log file".to_string(),
        )
    })?;
    let dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_local_dir())
        .to_path_buf();
    Ok(dir.join(LOG_FILE_NAME))
}

/// Absolute, symlink-resolved form of `path`, which need not exist yet.
///
/// The longest existing ancestor is canonicalized and the missing tail is
/// appended unchanged.
pub fn normalize(path: &Path) -> SyncResult<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| {
                SyncError::ConfigError(format!("Failed to read current directory: {}", e))
            })?
            .join(path)
    };

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut normalized =
        dunce::canonicalize(existing).unwrap_or_else(|_| existing.to_path_buf());
    for name in missing.iter().rev() {
        normalized.push(name);
    }
    Ok(normalized)
}
