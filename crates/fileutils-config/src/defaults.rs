//! Default locations for the plugin configuration.

/// Configuration file read when neither `--config` nor the environment override is set.
pub const DEFAULT_CONFIG_PATH: &str = "plugin.yaml";
/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "FILEUTILS_CONFIG";
