//! Sync Driver
//!
//! Wires the reconciler to the scheduler: every accepted tick runs one pass
//! over the configured pair and logs the pass summary.

use crate::audit::AuditLog;
use crate::config::ResolvedConfig;
use crate::error::SyncResult;
use crate::scheduler::{PassHandler, Scheduler};
use crate::sync::{PassOutcome, PassReport, Reconciler};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Runs reconcile passes for one source/replica pair.
pub struct SyncDriver {
    reconciler: Reconciler,
    source: PathBuf,
    replica: PathBuf,
    last_report: Mutex<Option<PassReport>>,
}

impl SyncDriver {
    pub fn new(reconciler: Reconciler, source: PathBuf, replica: PathBuf) -> Self {
        Self {
            reconciler,
            source,
            replica,
            last_report: Mutex::new(None),
        }
    }

    /// Build a driver writing its audit trail to the configured log file.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let audit = Arc::new(AuditLog::open(&config.log_file));
        Self::new(
            Reconciler::new(audit, config.max_concurrent_ops),
            config.source.clone(),
            config.replica.clone(),
        )
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn replica(&self) -> &Path {
        &self.replica
    }

    /// Report of the most recently finished pass.
    pub fn last_report(&self) -> Option<PassReport> {
        *self.last_report.lock()
    }

    /// Run a single pass and log its summary.
    pub async fn run_once(&self, cancel: &CancellationToken) -> PassReport {
        let report = self
            .reconciler
            .reconcile(&self.source, &self.replica, cancel)
            .await;

        let summary = &report.summary;
        match report.outcome() {
            PassOutcome::Success => info!(
                copied = summary.files_copied,
                deleted = summary.files_deleted + summary.dirs_deleted,
                "Replica is in sync"
            ),
            PassOutcome::PartialFailure => warn!(
                errors = summary.errors,
                "Pass finished with errors; failed entries will be retried next pass"
            ),
            PassOutcome::Cancelled => info!(skipped = summary.skipped, "Pass cancelled"),
        }

        *self.last_report.lock() = Some(report);
        report
    }

    /// Run passes every `interval` until `shutdown` resolves, then stop
    /// cooperatively.
    pub async fn run_until<F>(self: Arc<Self>, interval: Duration, shutdown: F) -> SyncResult<()>
    where
        F: Future<Output = ()>,
    {
        let scheduler = Scheduler::new();
        scheduler.start(interval, self.clone())?;
        shutdown.await;
        info!("Shutdown requested, cancelling in-flight work");
        scheduler.stop().await;

        let stats = scheduler.stats();
        info!(
            passes = stats.passes_completed,
            ticks_skipped = stats.ticks_skipped,
            last_outcome = self
                .last_report()
                .map(|report| report.outcome().as_str())
                .unwrap_or("none"),
            "Sync driver stopped"
        );
        Ok(())
    }
}

#[async_trait]
impl PassHandler for SyncDriver {
    async fn run_pass(&self, cancel: CancellationToken) {
        self.run_once(&cancel).await;
    }
}
