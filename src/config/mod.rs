//! Configuration management for formatbox
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use formatbox::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("JSON indent: {}", config.formats.json.indent);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `FORMATBOX__<section>__<key>`
//!
//! Examples:
//! - `FORMATBOX__FORMATS__JSON__INDENT=2`
//! - `FORMATBOX__FORMATS__INI__INTERPOLATION=false`
//! - `FORMATBOX__STORAGE__ROOT=/mnt/projects`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/formatbox.toml`.
//! This can be overridden using the `FORMATBOX_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{
    Config, FormatAlias, FormatsConfig, IniFormatConfig, JsonFormatConfig, StorageConfig,
    StorageProvider,
};
pub use validation::{MAX_JSON_INDENT, ValidationError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Failed to render configuration: {0}")]
    RenderError(#[from] toml::ser::Error),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`FORMATBOX__*`)
    /// 2. TOML file (default: `config/formatbox.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - Validation fails (bad aliases, missing storage root, etc.)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
