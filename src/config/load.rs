use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::merge::{apply_env_overrides, merge_layers};
use super::{Config, ConfigLayer};

/// A config file that exists but cannot be used.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub fn config_path() -> PathBuf {
    crate::paths::config_dir().join("config.toml")
}

pub fn repo_config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(".tigs.toml")
}

fn load_layer(path: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

pub fn load_user_config() -> Result<Option<ConfigLayer>, ConfigError> {
    load_layer(&config_path())
}

pub fn load_repo_config(repo_root: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
    load_layer(&repo_config_path(repo_root))
}

/// Defaults, then user config, then `<repo_root>/.tigs.toml`, then the
/// environment. CLI flags are applied by the caller on top.
pub fn load_for_repo(repo_root: Option<&Path>) -> Result<Config, ConfigError> {
    let user = load_user_config()?;
    let repo = match repo_root {
        Some(root) => load_repo_config(root)?,
        None => None,
    };
    let mut config = merge_layers(user, repo);
    apply_env_overrides(&mut config);
    Ok(config)
}
