//! User settings for the makestereo converter.
//!
//! Settings live in a small TOML file under the platform config directory
//! and supply defaults that command-line flags can override.
//!
//! # Example
//!
//! ```rust,no_run
//! use makestereo_config::{Settings, paths};
//! use makestereo_core::OutputFormat;
//!
//! let settings = Settings::default().with_output_format(OutputFormat::Wav);
//! settings.save(paths::settings_path()).unwrap();
//!
//! let loaded = Settings::load_or_default().unwrap();
//! assert_eq!(loaded.output_format, OutputFormat::Wav);
//! ```

mod error;
mod settings;

/// Platform-specific configuration paths.
pub mod paths;

pub use error::ConfigError;
pub use paths::{ensure_user_config_dir, settings_path, user_config_dir};
pub use settings::Settings;
