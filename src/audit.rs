//! Audit Log
//!
//! Append-only, human-readable trail of every mutation a pass performs. Each
//! record is written as one `<timestamp>: <message>` line to the log file and
//! mirrored to the console through `tracing`. Appends from concurrent tasks are
//! serialized so lines never interleave.

use crate::error::SyncError;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// One completed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    CreatedDir(PathBuf),
    CopiedFile { from: PathBuf, to: PathBuf },
    DeletedFile(PathBuf),
    DeletedDir(PathBuf),
    Error(String),
}

impl LogRecord {
    pub fn is_error(&self) -> bool {
        matches!(self, LogRecord::Error(_))
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogRecord::CreatedDir(path) => write!(f, "Created directory: {}", path.display()),
            LogRecord::CopiedFile { from, to } => {
                write!(f, "Copied file: {} to {}", from.display(), to.display())
            }
            LogRecord::DeletedFile(path) => write!(f, "Deleted file: {}", path.display()),
            LogRecord::DeletedDir(path) => write!(f, "Deleted directory: {}", path.display()),
            LogRecord::Error(description) => write!(f, "Error: {}", description),
        }
    }
}

impl From<&SyncError> for LogRecord {
    fn from(err: &SyncError) -> Self {
        LogRecord::Error(err.to_string())
    }
}

/// Format a record as a log file line (without trailing newline).
pub fn format_line(record: &LogRecord, at: DateTime<Local>) -> String {
    format!("{}: {}", at.format(TIMESTAMP_FORMAT), record)
}

/// Shared audit log destination.
pub struct AuditLog {
    path: Option<PathBuf>,
    file: Mutex<Option<File>>,
}

impl AuditLog {
    /// Open (or create) the log file at `path` for appending.
    ///
    /// Never fails: if the file cannot be opened the log degrades to console
    /// only and a warning is emitted.
    pub fn open(path: &Path) -> Self {
        let file = match open_append(path) {
            Ok(file) => Some(file),
            Err(err) if err.is_access() => {
                warn!(
                    error = %err,
                    "Audit log file is not writable by this user, logging to console only"
                );
                None
            }
            Err(err) => {
                warn!(error = %err, "Audit log file unavailable, logging to console only");
                None
            }
        };
        Self {
            path: Some(path.to_path_buf()),
            file: Mutex::new(file),
        }
    }

    /// An audit log that only reaches the console.
    pub fn console_only() -> Self {
        Self {
            path: None,
            file: Mutex::new(None),
        }
    }

    /// Whether records currently reach a log file.
    pub fn has_file(&self) -> bool {
        self.file.lock().is_some()
    }

    /// Append one record.
    pub fn record(&self, record: LogRecord) {
        if record.is_error() {
            warn!(target: "treesync::audit", "{}", record);
        } else {
            info!(target: "treesync::audit", "{}", record);
        }

        let line = format_line(&record, Local::now());
        let mut guard = self.file.lock();
        if let Some(file) = guard.as_mut() {
            let written = writeln!(file, "{}", line).and_then(|_| file.flush());
            if let Err(err) = written {
                let err = SyncError::io(
                    "write audit log",
                    self.path.as_deref().unwrap_or_else(|| Path::new("")),
                    err,
                );
                warn!(error = %err, "Failed to write audit record: {}", line);
            }
        }
    }
}

fn open_append(path: &Path) -> Result<File, SyncError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::io("create log directory", parent, e))?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| SyncError::io("open audit log", path, e))
}
