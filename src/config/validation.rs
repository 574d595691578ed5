use super::models::{Config, StorageProvider};
use crate::formats::BUILTIN_FORMATS;
use std::collections::HashSet;
use thiserror::Error;

/// Widest indent accepted for `.json` output
pub const MAX_JSON_INDENT: usize = 16;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("JSON indent {indent} exceeds limit of {max}")]
    IndentTooWide { indent: usize, max: usize },

    #[error("Alias '{alias}' must be a '.'-prefixed format identifier")]
    InvalidAliasId { alias: String },

    #[error("Alias '{alias}' targets unknown format '{target}'")]
    UnknownAliasTarget { alias: String, target: String },

    #[error("Alias '{alias}' would replace a built-in format")]
    AliasShadowsBuiltin { alias: String },

    #[error("Alias '{alias}' is declared more than once")]
    DuplicateAlias { alias: String },

    #[error("Storage root '{root}' is not a directory")]
    StorageRootMissing { root: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_json(config)?;
    validate_aliases(config)?;
    validate_storage(config)?;
    Ok(())
}

fn validate_json(config: &Config) -> Result<(), ValidationError> {
    let indent = config.formats.json.indent;
    if indent > MAX_JSON_INDENT {
        return Err(ValidationError::IndentTooWide {
            indent,
            max: MAX_JSON_INDENT,
        });
    }
    Ok(())
}

/// Aliases must look like identifiers, point at a built-in and not collide
fn validate_aliases(config: &Config) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();

    for alias in &config.formats.aliases {
        let id = alias.id.as_str();

        if id.len() < 2 || !id.starts_with('.') {
            return Err(ValidationError::InvalidAliasId {
                alias: alias.id.clone(),
            });
        }
        if BUILTIN_FORMATS.contains(&id) {
            return Err(ValidationError::AliasShadowsBuiltin {
                alias: alias.id.clone(),
            });
        }
        if !BUILTIN_FORMATS.contains(&alias.target.as_str()) {
            return Err(ValidationError::UnknownAliasTarget {
                alias: alias.id.clone(),
                target: alias.target.clone(),
            });
        }
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateAlias {
                alias: alias.id.clone(),
            });
        }
    }

    Ok(())
}

fn validate_storage(config: &Config) -> Result<(), ValidationError> {
    if config.storage.provider == StorageProvider::Local && !config.storage.root.is_dir() {
        return Err(ValidationError::StorageRootMissing {
            root: config.storage.root.display().to_string(),
        });
    }
    Ok(())
}
