//! Core types shared across the sync engine.

/// Digest: BLAKE3 content fingerprint of a file
pub type Digest = [u8; 32];

/// Default file name used when the configured log path is a directory
pub const LOG_FILE_NAME: &str = "treesync.log";
