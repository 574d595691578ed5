use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::formats::DEFAULT_INDENT;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub formats: FormatsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Handler options and extra format identifiers
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FormatsConfig {
    #[serde(default)]
    pub json: JsonFormatConfig,
    #[serde(default)]
    pub ini: IniFormatConfig,
    /// Additional identifiers served by a built-in handler
    #[serde(default)]
    pub aliases: Vec<FormatAlias>,
}

/// `.json` handler options
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JsonFormatConfig {
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Write `{}` instead of failing on NaN/infinity (legacy stores only)
    #[serde(default)]
    pub degrade_non_finite: bool,
}

impl Default for JsonFormatConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            degrade_non_finite: false,
        }
    }
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

/// `.ini` handler options
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IniFormatConfig {
    #[serde(default = "default_interpolation")]
    pub interpolation: bool,
}

impl Default for IniFormatConfig {
    fn default() -> Self {
        Self {
            interpolation: default_interpolation(),
        }
    }
}

fn default_interpolation() -> bool {
    true
}

/// Extra identifier for a built-in format, e.g. `.cfg` -> `.ini`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormatAlias {
    pub id: String,
    pub target: String,
}

/// Storage provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    #[default]
    Local,
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub provider: StorageProvider,
    /// Directory documents are read from and written to (local provider)
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::Local,
            root: default_root(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
