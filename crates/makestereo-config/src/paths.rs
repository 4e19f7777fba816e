//! Platform-specific configuration paths.
//!
//! - Linux: `~/.config/makestereo/settings.toml`
//! - macOS: `~/Library/Application Support/makestereo/settings.toml`
//! - Windows: `%APPDATA%\makestereo\settings.toml`

use crate::ConfigError;
use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "makestereo";

/// File name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to `./makestereo` if the platform config directory cannot be
/// determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the user settings file.
pub fn settings_path() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE)
}

/// Ensure the user config directory exists.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::no_directory(&dir, e))?;
    }

    Ok(dir)
}
