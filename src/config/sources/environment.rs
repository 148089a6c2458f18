//! Environment variable source: TREESYNC_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Environment variable prefix for configuration keys.
pub const ENV_PREFIX: &str = "TREESYNC";

/// Add environment variable overlay to builder.
/// `TREESYNC_INTERVAL_SECS` sets `interval_secs`; `__` separates nested keys,
/// as in `TREESYNC_LOGGING__LEVEL`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
