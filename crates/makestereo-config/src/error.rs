//! Settings file errors.

use std::path::PathBuf;
use thiserror::Error;

/// Why the settings file could not be loaded or stored.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file exists but could not be opened or read.
    #[error("cannot read settings from '{path}': {source}")]
    Unreadable {
        /// Settings file location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file could not be written.
    #[error("cannot store settings in '{path}': {source}")]
    Unwritable {
        /// Settings file location.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or has an unknown value.
    #[error("settings file is malformed: {0}")]
    Malformed(#[from] toml::de::Error),

    /// Settings could not be rendered as TOML.
    #[error("cannot encode settings: {0}")]
    Encode(#[from] toml::ser::Error),

    /// The directory meant to hold the settings file could not be created.
    #[error("cannot create settings directory '{path}': {source}")]
    NoDirectory {
        /// Directory that was being created.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Unreadable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unwritable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Unwritable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn no_directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::NoDirectory {
            path: path.into(),
            source,
        }
    }
}
