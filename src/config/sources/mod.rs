//! Individual configuration sources.

pub mod cli_overrides;
pub mod environment;
pub mod file;
