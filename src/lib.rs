//! Treesync: One-Way Periodic Directory Mirroring
//!
//! Keeps a replica directory tree identical to a source tree. Each pass
//! recomputes the full difference from live filesystem state, comparing files
//! by BLAKE3 content fingerprint, then copies new or changed files and removes
//! replica entries that no longer exist in the source.

pub mod audit;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod scheduler;
pub mod sync;
pub mod tooling;
pub mod tree;
pub mod types;

pub use audit::{AuditLog, LogRecord};
pub use driver::SyncDriver;
pub use error::{SyncError, SyncResult};
pub use scheduler::{PassHandler, Scheduler, SchedulerState};
pub use sync::{PassOutcome, PassReport, PassSummary, Reconciler};
