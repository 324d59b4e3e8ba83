use crate::core::RemoteName;
use crate::sync::Strategy;

use super::{Config, ConfigLayer};

pub fn merge_layers(user: Option<ConfigLayer>, repo: Option<ConfigLayer>) -> Config {
    let mut config = Config::default();
    if let Some(layer) = user {
        layer.apply_to(&mut config);
    }
    if let Some(layer) = repo {
        layer.apply_to(&mut config);
    }
    config
}

pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Apply `TIGS_*` overrides read through `lookup`. Invalid values are
/// ignored with a warning.
pub fn apply_overrides_from(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let value = |key: &str| {
        lookup(key)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
    };

    if let Some(raw) = value("TIGS_REMOTE") {
        match RemoteName::parse(&raw) {
            Ok(remote) => config.remote = remote,
            Err(err) => tracing::warn!("invalid TIGS_REMOTE, ignoring: {err}"),
        }
    }

    if let Some(raw) = value("TIGS_STRATEGY") {
        match raw.parse::<Strategy>() {
            Ok(strategy) => config.strategy = strategy,
            Err(err) => tracing::warn!("invalid TIGS_STRATEGY, ignoring: {err}"),
        }
    }

    if let Some(raw) = value("TIGS_LOG_DIR") {
        config.logging.file.dir = Some(raw.into());
    }
}
