//! Path resolution helpers for configuration.

pub mod log_file;

pub use log_file::{default_log_file_path, normalize, resolve_log_file_path};
