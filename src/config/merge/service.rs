//! MergeService: orchestrates sources, applies merge policy, deserializes to SyncConfig.

use crate::config::sources::{cli_overrides, environment, file};
use crate::config::{ConfigOverrides, SyncConfig};
use config::ConfigError;
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> config file -> environment -> CLI overrides (highest).
    pub fn load(
        config_file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<SyncConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = file::add_to_builder(builder, config_file)?;
        let builder = environment::add_to_builder(builder)?;
        let builder = cli_overrides::add_to_builder(builder, overrides)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
