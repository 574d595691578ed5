use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::ini::IniHandler;
use super::json::JsonHandler;
use super::remote::RemoteDocumentHandler;
use super::text::TextHandler;
use super::traits::{Direction, FormatError, FormatHandler};
use crate::config::FormatsConfig;
use crate::remote::{Credentials, RemoteDocuments};
use crate::value::Value;

pub const TXT: &str = ".txt";
pub const JSON: &str = ".json";
pub const INI: &str = ".ini";
pub const GDOC: &str = ".gdoc";

/// Format identifiers registered by [`FormatRegistry::with_defaults`]
pub const BUILTIN_FORMATS: [&str; 4] = [TXT, JSON, INI, GDOC];

/// Registry mapping format identifiers to handlers
///
/// Built once by value, then shared (usually behind an `Arc`). Lookups are
/// exact and case-sensitive: `.json` is registered, `.JSON` is not.
#[derive(Clone)]
pub struct FormatRegistry {
    handlers: BTreeMap<String, Arc<dyn FormatHandler>>,
}

impl FormatRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, format_id: impl Into<String>, handler: Arc<dyn FormatHandler>) {
        self.handlers.insert(format_id.into(), handler);
    }

    pub fn get(&self, format_id: &str) -> Result<Arc<dyn FormatHandler>, FormatError> {
        self.handlers
            .get(format_id)
            .cloned()
            .ok_or_else(|| FormatError::UnsupportedFormat(format_id.to_string()))
    }

    pub fn has_format(&self, format_id: &str) -> bool {
        self.handlers.contains_key(format_id)
    }

    /// Registered identifiers in sorted order
    pub fn format_ids(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Registry with the built-in handlers and their default options
    pub fn with_defaults() -> Self {
        Self::from_config(&FormatsConfig::default())
    }

    /// Registry with the built-in handlers configured from `config`,
    /// plus any aliases it declares
    pub fn from_config(config: &FormatsConfig) -> Self {
        let mut registry = Self::new();

        registry.register(TXT, Arc::new(TextHandler::new()));
        registry.register(
            JSON,
            Arc::new(
                JsonHandler::new()
                    .with_indent(config.json.indent)
                    .degrade_non_finite(config.json.degrade_non_finite),
            ),
        );
        registry.register(
            INI,
            Arc::new(IniHandler::new().with_interpolation(config.ini.interpolation)),
        );
        registry.register(GDOC, Arc::new(RemoteDocumentHandler::new()));

        for alias in &config.aliases {
            if registry.has_format(&alias.id) {
                tracing::warn!(
                    alias = %alias.id,
                    target = %alias.target,
                    "Skipping alias that would replace a registered format"
                );
                continue;
            }
            match registry.handlers.get(&alias.target).cloned() {
                Some(handler) => registry.register(alias.id.clone(), handler),
                None => tracing::warn!(
                    alias = %alias.id,
                    target = %alias.target,
                    "Skipping alias to unregistered format"
                ),
            }
        }

        registry
    }

    /// Attach a document service client to the `.gdoc` handler and any
    /// aliases of it
    pub fn with_remote_documents(
        mut self,
        client: Arc<dyn RemoteDocuments>,
        credentials: Credentials,
    ) -> Self {
        let connected: Arc<dyn FormatHandler> =
            Arc::new(RemoteDocumentHandler::connected(client, credentials));

        let Some(current) = self.handlers.get(GDOC).cloned() else {
            self.register(GDOC, connected);
            return self;
        };
        for handler in self.handlers.values_mut() {
            if Arc::ptr_eq(handler, &current) {
                *handler = connected.clone();
            }
        }
        self
    }

    /// Transform an application value into its persisted form
    pub fn outbound(&self, value: &Value, format_id: &str) -> Result<Value, FormatError> {
        let handler = self.get(format_id)?;
        tracing::debug!(
            format_id,
            direction = %Direction::Outbound,
            handler = handler.name(),
            "Dispatching"
        );
        handler.outbound(value)
    }

    /// Transform a persisted form into an application value
    pub fn inbound(&self, raw: &Value, format_id: &str) -> Result<Value, FormatError> {
        let handler = self.get(format_id)?;
        tracing::debug!(
            format_id,
            direction = %Direction::Inbound,
            handler = handler.name(),
            "Dispatching"
        );
        handler.inbound(raw)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Format identifier of a path: its extension with the leading dot
///
/// ```
/// use formatbox::formats::format_id_for_path;
///
/// assert_eq!(format_id_for_path("chan4.kvs/properties.json"), Some(".json"));
/// assert_eq!(format_id_for_path("README"), None);
/// ```
pub fn format_id_for_path(path: &str) -> Option<&str> {
    let file_name = Path::new(path).file_name()?.to_str()?;
    let extension = Path::new(file_name).extension()?.to_str()?;
    // extension() excludes the dot, which sits right before it
    Some(&file_name[file_name.len() - extension.len() - 1..])
}
