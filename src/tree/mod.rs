//! Filesystem snapshots and content fingerprints

pub mod hasher;
pub mod node;

pub use hasher::{files_identical, fingerprint, to_hex};
pub use node::DirectoryNode;
