//! Tree Reconciler
//!
//! Makes a replica directory tree match a source tree. Every directory visit
//! snapshots both sides, then fans out one task per source file, per source
//! subdirectory (recursively) and per extraneous replica entry, and joins them
//! before returning its [`PassSummary`] to the parent.
//!
//! Failures are confined to the entry that produced them: they are recorded in
//! the audit log, counted, and the remaining siblings carry on.

use super::ops::{self, EntryKind};
use super::summary::{PassReport, PassSummary};
use crate::audit::{AuditLog, LogRecord};
use crate::error::{SyncError, SyncResult};
use crate::tree::DirectoryNode;
use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Default cap on concurrently open file operations per pass
pub const DEFAULT_MAX_CONCURRENT_OPS: usize = 64;

/// One-way reconciler from a source tree onto a replica tree.
///
/// Holds no state between passes besides the audit destination and the
/// concurrency cap.
#[derive(Clone)]
pub struct Reconciler {
    audit: Arc<AuditLog>,
    max_concurrent_ops: usize,
}

/// State shared by every task of one pass.
struct PassContext {
    audit: Arc<AuditLog>,
    permits: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl PassContext {
    /// Wait for an I/O slot; fails with `Cancelled` once the pass is cancelled.
    async fn permit(&self) -> SyncResult<OwnedSemaphorePermit> {
        if self.cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }
        let permit = tokio::select! {
            permit = self.permits.clone().acquire_owned() => {
                permit.map_err(|_| SyncError::Cancelled)?
            }
            _ = self.cancel.cancelled() => return Err(SyncError::Cancelled),
        };
        // Cancellation may have been raised while waiting for the slot
        if self.cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }
        Ok(permit)
    }

    fn fail(&self, err: &SyncError, summary: &mut PassSummary) {
        self.audit.record(LogRecord::from(err));
        summary.errors += 1;
    }

    fn log(&self, record: LogRecord) {
        self.audit.record(record);
    }
}

fn skipped() -> PassSummary {
    PassSummary {
        skipped: 1,
        cancelled: true,
        ..Default::default()
    }
}

impl Reconciler {
    pub fn new(audit: Arc<AuditLog>, max_concurrent_ops: usize) -> Self {
        Self {
            audit,
            max_concurrent_ops: max_concurrent_ops.max(1),
        }
    }

    /// Run one full pass making `replica` match `source`.
    ///
    /// Never fails as a whole: per-entry failures are reflected in the
    /// returned summary and the audit log.
    pub async fn reconcile(
        &self,
        source: &Path,
        replica: &Path,
        cancel: &CancellationToken,
    ) -> PassReport {
        let started = Instant::now();
        let ctx = Arc::new(PassContext {
            audit: Arc::clone(&self.audit),
            permits: Arc::new(Semaphore::new(self.max_concurrent_ops)),
            cancel: cancel.clone(),
        });

        info!(
            source = %source.display(),
            replica = %replica.display(),
            "Starting sync pass"
        );
        let summary =
            reconcile_dir(ctx, source.to_path_buf(), replica.to_path_buf(), true).await;
        let report = PassReport {
            summary,
            elapsed: started.elapsed(),
        };
        info!(
            outcome = report.outcome().as_str(),
            duration_ms = report.elapsed.as_millis() as u64,
            "Sync pass finished: {}",
            report.summary
        );
        report
    }
}

/// Reconcile one directory pair and everything below it.
fn reconcile_dir(
    ctx: Arc<PassContext>,
    source: PathBuf,
    replica: PathBuf,
    is_root: bool,
) -> BoxFuture<'static, PassSummary> {
    async move {
        let mut summary = PassSummary::default();

        let (source_node, replica_node) = {
            let Ok(_permit) = ctx.permit().await else {
                return skipped();
            };
            if let Err(err) = ensure_replica_dir(&ctx, &replica, is_root, &mut summary).await {
                ctx.fail(&err, &mut summary);
                return summary;
            }
            let source_node = match ops::snapshot(&source).await {
                Ok(node) => node,
                Err(err) => {
                    ctx.fail(&err, &mut summary);
                    return summary;
                }
            };
            let replica_node = match ops::snapshot(&replica).await {
                Ok(node) => node,
                Err(err) => {
                    ctx.fail(&err, &mut summary);
                    return summary;
                }
            };
            (source_node, replica_node)
        };

        debug!(
            replica = %replica.display(),
            files = source_node.files.len(),
            directories = source_node.directories.len(),
            "Reconciling directory"
        );

        let mut tasks = JoinSet::new();
        spawn_children(&mut tasks, &ctx, &source, &replica, &source_node, &replica_node);

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(child) => summary.merge(child),
                Err(err) => {
                    error!(replica = %replica.display(), error = %err, "Sync task failed");
                    ctx.log(LogRecord::Error(format!(
                        "task in {} did not complete: {}",
                        replica.display(),
                        err
                    )));
                    summary.errors += 1;
                }
            }
        }

        summary
    }
    .boxed()
}

fn spawn_children(
    tasks: &mut JoinSet<PassSummary>,
    ctx: &Arc<PassContext>,
    source: &Path,
    replica: &Path,
    source_node: &DirectoryNode,
    replica_node: &DirectoryNode,
) {
    for name in &source_node.files {
        let slot = if replica_node.files.contains(name) {
            EntryKind::File
        } else if replica_node.directories.contains(name) {
            EntryKind::Directory
        } else if replica_node.others.contains(name) {
            EntryKind::Other
        } else {
            EntryKind::Missing
        };
        tasks.spawn(sync_file(
            Arc::clone(ctx),
            source.join(name),
            replica.join(name),
            slot,
        ));
    }

    for name in &source_node.directories {
        tasks.spawn(reconcile_dir(
            Arc::clone(ctx),
            source.join(name),
            replica.join(name),
            false,
        ));
    }

    for name in replica_node
        .extraneous_files(source_node)
        .chain(replica_node.extraneous_others(source_node))
    {
        tasks.spawn(delete_file(Arc::clone(ctx), replica.join(name)));
    }

    for name in replica_node.extraneous_directories(source_node) {
        tasks.spawn(delete_dir(Arc::clone(ctx), replica.join(name)));
    }
}

/// Make sure `replica` is a directory, creating it when absent.
///
/// Below the root, a non-directory occupying the name is replaced. The root
/// itself is never deleted.
async fn ensure_replica_dir(
    ctx: &PassContext,
    replica: &Path,
    is_root: bool,
    summary: &mut PassSummary,
) -> SyncResult<()> {
    match ops::entry_kind(replica).await? {
        EntryKind::Directory => return Ok(()),
        EntryKind::Missing => {}
        EntryKind::File | EntryKind::Other if !is_root => {
            ops::remove_file(replica).await?;
            ctx.log(LogRecord::DeletedFile(replica.to_path_buf()));
            summary.files_deleted += 1;
        }
        EntryKind::File | EntryKind::Other => {
            return Err(SyncError::io(
                "create directory",
                replica,
                std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "path exists and is not a directory",
                ),
            ));
        }
    }

    ops::create_dir(replica, is_root).await?;
    ctx.log(LogRecord::CreatedDir(replica.to_path_buf()));
    summary.dirs_created += 1;
    Ok(())
}

async fn sync_file(
    ctx: Arc<PassContext>,
    source: PathBuf,
    replica: PathBuf,
    slot: EntryKind,
) -> PassSummary {
    let mut summary = PassSummary::default();
    let Ok(_permit) = ctx.permit().await else {
        return skipped();
    };

    let needs_copy = match slot {
        EntryKind::File => match ops::content_differs(&source, &replica).await {
            Ok(differs) => differs,
            Err(err) => {
                ctx.fail(&err, &mut summary);
                return summary;
            }
        },
        EntryKind::Directory => {
            if let Err(err) = ops::remove_dir(&replica).await {
                ctx.fail(&err, &mut summary);
                return summary;
            }
            ctx.log(LogRecord::DeletedDir(replica.clone()));
            summary.dirs_deleted += 1;
            true
        }
        EntryKind::Other => {
            if let Err(err) = ops::remove_file(&replica).await {
                ctx.fail(&err, &mut summary);
                return summary;
            }
            ctx.log(LogRecord::DeletedFile(replica.clone()));
            summary.files_deleted += 1;
            true
        }
        EntryKind::Missing => true,
    };

    if !needs_copy {
        summary.files_unchanged += 1;
        return summary;
    }
    // Hashing can outlast a stop request
    if ctx.cancel.is_cancelled() {
        summary.merge(skipped());
        return summary;
    }

    match ops::copy_file(&source, &replica).await {
        Ok(()) => {
            ctx.log(LogRecord::CopiedFile {
                from: source,
                to: replica,
            });
            summary.files_copied += 1;
        }
        Err(err) => ctx.fail(&err, &mut summary),
    }
    summary
}

async fn delete_file(ctx: Arc<PassContext>, replica: PathBuf) -> PassSummary {
    let mut summary = PassSummary::default();
    let Ok(_permit) = ctx.permit().await else {
        return skipped();
    };
    match ops::remove_file(&replica).await {
        Ok(()) => {
            ctx.log(LogRecord::DeletedFile(replica));
            summary.files_deleted += 1;
        }
        Err(err) => ctx.fail(&err, &mut summary),
    }
    summary
}

async fn delete_dir(ctx: Arc<PassContext>, replica: PathBuf) -> PassSummary {
    let mut summary = PassSummary::default();
    let Ok(_permit) = ctx.permit().await else {
        return skipped();
    };
    match ops::remove_dir(&replica).await {
        Ok(()) => {
            ctx.log(LogRecord::DeletedDir(replica));
            summary.dirs_deleted += 1;
        }
        Err(err) => ctx.fail(&err, &mut summary),
    }
    summary
}
