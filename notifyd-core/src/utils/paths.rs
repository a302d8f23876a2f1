//! XDG directory resolution for the daemon.
//!
//! The configuration file lives in `$XDG_CONFIG_HOME/NovaDE/` next to the
//! other desktop components. Runtime state (log files) goes to
//! `$XDG_STATE_HOME/NovaDE/notifyd/`.

use crate::error::{ConfigError, CoreError};
use directories_next::BaseDirs;
use std::path::PathBuf;

const ORGANIZATION: &str = "NovaDE";
const APPLICATION: &str = "notifyd";

fn unavailable(dir_type: &str) -> CoreError {
    CoreError::Config(ConfigError::DirectoryUnavailable {
        dir_type: dir_type.to_string(),
    })
}

/// Returns the user configuration base directory (`$XDG_CONFIG_HOME`).
pub fn get_config_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| unavailable("Config Base"))
}

/// Returns the user state base directory.
///
/// On Linux this is `$XDG_STATE_HOME`, or `~/.local/state` when unset.
/// Elsewhere the local data directory is used.
pub fn get_state_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| {
            #[cfg(target_os = "linux")]
            {
                match std::env::var("XDG_STATE_HOME") {
                    Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
                    _ => dirs.home_dir().join(".local/state"),
                }
            }
            #[cfg(not(target_os = "linux"))]
            {
                dirs.data_local_dir().to_path_buf()
            }
        })
        .ok_or_else(|| unavailable("State Base"))
}

/// Returns the directory holding `notifyd.toml`.
///
/// # Errors
///
/// [`ConfigError::DirectoryUnavailable`] if no home directory can be found.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    get_config_base_dir()
        .map(|base| base.join(ORGANIZATION))
        .map_err(|_| unavailable("App Config"))
}

/// Returns the daemon's state directory, used for relative log file paths.
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    get_state_base_dir()
        .map(|base| base.join(ORGANIZATION).join(APPLICATION))
        .map_err(|_| unavailable("App State"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_config_dir_is_organization_dir_under_config_base() {
        if let (Ok(base), Ok(app)) = (get_config_base_dir(), get_app_config_dir()) {
            assert_eq!(app, base.join("NovaDE"));
        }
    }

    #[test]
    fn app_state_dir_ends_with_application_name() {
        if let Ok(state_dir) = get_app_state_dir() {
            assert!(state_dir.ends_with("NovaDE/notifyd"));
        }
    }
}
