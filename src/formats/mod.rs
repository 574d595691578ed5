//! Format handlers and the registry that dispatches to them
//!
//! A format identifier (a file-extension-like tag such as `.json`) selects a
//! handler. Every handler converts in two directions:
//!
//! - **outbound**: application value -> persisted form, before writing
//! - **inbound**: persisted form -> application value, after reading
//!
//! ## Key Components
//!
//! - [`FormatHandler`] - Trait every format implements
//! - [`FormatRegistry`] - Format identifier -> handler lookup and dispatch
//! - [`FormatError`] - Unsupported format, malformed input, corrupted data,
//!   not implemented, remote failure
//!
//! ## Example
//!
//! ```
//! use formatbox::formats::FormatRegistry;
//! use formatbox::value::Value;
//!
//! let registry = FormatRegistry::with_defaults();
//!
//! let value: Value = [("Key", "Value")].into_iter().collect();
//! let written = registry.outbound(&value, ".json")?;
//! assert_eq!(registry.inbound(&written, ".json")?, value);
//! # Ok::<(), formatbox::formats::FormatError>(())
//! ```

mod ini;
mod json;
mod registry;
mod remote;
mod text;
mod traits;

pub use ini::{DEFAULT_SECTION, IniHandler};
pub use json::{DEFAULT_INDENT, JsonHandler};
pub use registry::{BUILTIN_FORMATS, FormatRegistry, GDOC, INI, JSON, TXT, format_id_for_path};
pub use remote::RemoteDocumentHandler;
pub use text::TextHandler;
pub use traits::{Direction, FormatError, FormatHandler};
