//! Tooling & Integration Layer
//!
//! Command-line entry points for running the sync daemon or a single pass.

pub mod cli;

pub use cli::Cli;
