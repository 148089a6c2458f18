//! Command-line overrides, the highest-precedence layer.

use crate::config::ConfigOverrides;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use std::path::PathBuf;

fn path_value(path: &Option<PathBuf>) -> Option<String> {
    path.as_ref().map(|p| p.to_string_lossy().into_owned())
}

fn int_value<T: TryInto<i64>>(value: Option<T>) -> Option<i64> {
    value.map(|v| v.try_into().unwrap_or(i64::MAX))
}

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    overrides: &ConfigOverrides,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_override_option("source", path_value(&overrides.source))?
        .set_override_option("replica", path_value(&overrides.replica))?
        .set_override_option("log_path", path_value(&overrides.log_path))?
        .set_override_option("interval_secs", int_value(overrides.interval_secs))?
        .set_override_option("max_concurrent_ops", int_value(overrides.max_concurrent_ops))?
        .set_override_option("logging.level", overrides.log_level.clone())?
        .set_override_option("logging.format", overrides.log_format.clone())
}
