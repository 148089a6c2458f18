//! ConfigLoader facade delegating to merge service and validation.

use super::merge::service::MergeService;
use super::{ConfigOverrides, ResolvedConfig, SyncConfig};
use crate::error::SyncResult;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources without validating it.
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> SyncResult<SyncConfig> {
        Ok(MergeService::load(file, overrides)?)
    }

    /// Load and validate configuration, resolving paths for the daemon.
    pub fn load_resolved(
        file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> SyncResult<ResolvedConfig> {
        Self::load(file, overrides)?.resolve()
    }
}
