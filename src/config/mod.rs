//! Config loading: built-in defaults, user file, repo file, environment.

mod load;
mod merge;
mod schema;

pub use load::{
    ConfigError, config_path, load_for_repo, load_repo_config, load_user_config, repo_config_path,
};
pub use merge::{apply_env_overrides, apply_overrides_from, merge_layers};
pub use schema::{
    Config, ConfigLayer, FileLoggingConfig, FileLoggingConfigOverride, LogFormat, LogRotation,
    LoggingConfig, LoggingConfigOverride,
};
