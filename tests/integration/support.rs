use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use treesync::{AuditLog, PassReport, Reconciler};
use walkdir::WalkDir;

/// Source tree, replica location and audit log inside one temp dir.
pub struct Fixture {
    _temp: TempDir,
    pub source: PathBuf,
    pub replica: PathBuf,
    pub log: PathBuf,
    reconciler: Reconciler,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_ops(treesync::sync::DEFAULT_MAX_CONCURRENT_OPS)
    }

    pub fn with_ops(max_concurrent_ops: usize) -> Self {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        let replica = temp.path().join("replica");
        let log = temp.path().join("logs").join("treesync.log");
        fs::create_dir(&source).unwrap();
        let reconciler = Reconciler::new(Arc::new(AuditLog::open(&log)), max_concurrent_ops);
        Self {
            _temp: temp,
            source,
            replica,
            log,
            reconciler,
        }
    }

    pub fn reconciler(&self) -> Reconciler {
        self.reconciler.clone()
    }

    pub async fn pass(&self) -> PassReport {
        self.pass_with(&CancellationToken::new()).await
    }

    pub async fn pass_with(&self, cancel: &CancellationToken) -> PassReport {
        self.reconciler
            .reconcile(&self.source, &self.replica, cancel)
            .await
    }

    /// Audit messages written so far, timestamps stripped.
    pub fn log_messages(&self) -> Vec<String> {
        let Ok(contents) = fs::read_to_string(&self.log) else {
            return Vec::new();
        };
        contents
            .lines()
            .map(|line| {
                line.split_once(": ")
                    .map(|(_, message)| message.to_string())
                    .unwrap_or_default()
            })
            .collect()
    }

    pub fn count_logged(&self, prefix: &str) -> usize {
        self.log_messages()
            .iter()
            .filter(|m| m.starts_with(prefix))
            .count()
    }
}

/// Write `contents` at `rel` under `root`, creating parent directories.
pub fn write(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Dir,
    File(Vec<u8>),
}

/// Every entry below `root`, keyed by relative path.
pub fn tree(root: &Path) -> BTreeMap<String, Entry> {
    let mut entries = BTreeMap::new();
    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry.unwrap();
        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap()
            .to_string_lossy()
            .replace('\\', "/");
        let kind = if entry.file_type().is_dir() {
            Entry::Dir
        } else {
            Entry::File(fs::read(entry.path()).unwrap())
        };
        entries.insert(rel, kind);
    }
    entries
}
