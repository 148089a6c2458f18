//! Directory snapshots taken at the start of each directory visit

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Immediate children of one directory, split by kind.
///
/// Names are kept as the OS reports them, so entries that are not valid
/// UTF-8 still join back onto their parent path. Symlinks and special files
/// are never mirrored; they are tracked in `others` only so a replica can be
/// cleaned of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryNode {
    pub files: BTreeSet<OsString>,
    pub directories: BTreeSet<OsString>,
    pub others: BTreeSet<OsString>,
}

impl DirectoryNode {
    /// Read the immediate files and subdirectories of `path`.
    ///
    /// Fails if the directory cannot be listed or any child cannot be
    /// inspected; the caller treats that as a failure of this subtree.
    pub fn read(path: &Path) -> io::Result<Self> {
        let mut node = DirectoryNode::default();

        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false);

        for entry in walker {
            let entry = entry.map_err(io::Error::from)?;
            let name = entry.file_name().to_os_string();
            let file_type = entry.file_type();
            if file_type.is_file() {
                node.files.insert(name);
            } else if file_type.is_dir() {
                node.directories.insert(name);
            } else {
                debug!(path = %entry.path().display(), "Found non-regular entry");
                node.others.insert(name);
            }
        }

        Ok(node)
    }

    /// Whether `name` exists here as either a file or a directory.
    pub fn contains(&self, name: &OsStr) -> bool {
        self.files.contains(name) || self.directories.contains(name)
    }

    /// Replica files with no source entry of the same name.
    pub fn extraneous_files<'a>(
        &'a self,
        source: &'a DirectoryNode,
    ) -> impl Iterator<Item = &'a OsString> {
        self.files.iter().filter(move |name| !source.contains(name))
    }

    /// Replica symlinks and special files with no source entry of the same name.
    pub fn extraneous_others<'a>(
        &'a self,
        source: &'a DirectoryNode,
    ) -> impl Iterator<Item = &'a OsString> {
        self.others.iter().filter(move |name| !source.contains(name))
    }

    /// Replica directories with no source entry of the same name.
    pub fn extraneous_directories<'a>(
        &'a self,
        source: &'a DirectoryNode,
    ) -> impl Iterator<Item = &'a OsString> {
        self.directories
            .iter()
            .filter(move |name| !source.contains(name))
    }
}
