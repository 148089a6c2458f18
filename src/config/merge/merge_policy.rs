//! Built-in defaults, the lowest-precedence layer.

use crate::config::DEFAULT_INTERVAL_SECS;
use crate::sync::DEFAULT_MAX_CONCURRENT_OPS;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub(crate) fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("interval_secs", DEFAULT_INTERVAL_SECS as i64)?
        .set_default("max_concurrent_ops", DEFAULT_MAX_CONCURRENT_OPS as i64)
}
