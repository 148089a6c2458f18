//! Filesystem primitives used by the reconciler.
//!
//! Blocking work (directory listings, hashing) runs on the blocking pool so
//! a pass can keep many entries in flight.

use crate::error::{SyncError, SyncResult};
use crate::tree::{files_identical, DirectoryNode};
use std::io;
use std::path::Path;

/// What currently occupies a replica path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    Missing,
    File,
    Directory,
    /// Symlinks and special files
    Other,
}

async fn blocking<T, F>(f: F) -> io::Result<T>
where
    F: FnOnce() -> io::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
}

pub(crate) async fn entry_kind(path: &Path) -> SyncResult<EntryKind> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(EntryKind::Directory),
        Ok(meta) if meta.is_file() => Ok(EntryKind::File),
        Ok(_) => Ok(EntryKind::Other),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(EntryKind::Missing),
        Err(e) => Err(SyncError::io("inspect", path, e)),
    }
}

pub(crate) async fn snapshot(path: &Path) -> SyncResult<DirectoryNode> {
    let owned = path.to_path_buf();
    blocking(move || DirectoryNode::read(&owned))
        .await
        .map_err(|e| SyncError::io("list directory", path, e))
}

pub(crate) async fn create_dir(path: &Path, with_parents: bool) -> SyncResult<()> {
    let result = if with_parents {
        tokio::fs::create_dir_all(path).await
    } else {
        tokio::fs::create_dir(path).await
    };
    result.map_err(|e| SyncError::io("create directory", path, e))
}

/// Whether the replica file must be (re)written from the source file.
pub(crate) async fn content_differs(source: &Path, replica: &Path) -> SyncResult<bool> {
    let (a, b) = (source.to_path_buf(), replica.to_path_buf());
    blocking(move || match files_identical(&a, &b) {
        // Replica vanished since the snapshot
        Err(e) if e.kind() == io::ErrorKind::NotFound && a.is_file() => Ok(false),
        other => other,
    })
    .await
    .map(|identical| !identical)
    .map_err(|e| SyncError::io("compare", source, e))
}

pub(crate) async fn copy_file(source: &Path, replica: &Path) -> SyncResult<()> {
    // Never write through a symlink sitting at the replica path
    if let Ok(meta) = tokio::fs::symlink_metadata(replica).await {
        if meta.file_type().is_symlink() {
            remove_file(replica).await?;
        }
    }
    tokio::fs::copy(source, replica)
        .await
        .map(|_| ())
        .map_err(|e| SyncError::io("copy", source, e))
}

pub(crate) async fn remove_file(path: &Path) -> SyncResult<()> {
    tokio::fs::remove_file(path)
        .await
        .map_err(|e| SyncError::io("delete file", path, e))
}

pub(crate) async fn remove_dir(path: &Path) -> SyncResult<()> {
    tokio::fs::remove_dir_all(path)
        .await
        .map_err(|e| SyncError::io("delete directory", path, e))
}
