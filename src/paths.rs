//! XDG directory helpers for config/log locations.

use std::path::PathBuf;

/// Read a directory override from the environment, ignoring blank values.
fn env_dir(var: &str) -> Option<PathBuf> {
    std::env::var(var)
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
}

/// `$<xdg_var>/tigs`, falling back to `~/<fallback>/tigs`.
fn xdg_dir(xdg_var: &str, fallback: &[&str]) -> PathBuf {
    env_dir(xdg_var)
        .unwrap_or_else(|| {
            let mut dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
            dir.extend(fallback);
            dir
        })
        .join("tigs")
}

/// Base directory for configuration files.
///
/// Uses `TIGS_CONFIG_DIR` if set, otherwise `$XDG_CONFIG_HOME/tigs` or
/// `~/.config/tigs`.
pub(crate) fn config_dir() -> PathBuf {
    env_dir("TIGS_CONFIG_DIR").unwrap_or_else(|| xdg_dir("XDG_CONFIG_HOME", &[".config"]))
}

/// Base directory for persistent data.
///
/// `$XDG_DATA_HOME/tigs` or `~/.local/share/tigs`.
pub(crate) fn data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}

/// Default directory for rolling log files.
///
/// Uses `TIGS_LOG_DIR` if set, otherwise `<data_dir>/logs`.
pub(crate) fn log_dir() -> PathBuf {
    env_dir("TIGS_LOG_DIR").unwrap_or_else(|| data_dir().join("logs"))
}
