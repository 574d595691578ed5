use std::fmt;
use thiserror::Error;

use crate::remote::RemoteError;
use crate::value::Value;

/// Which way a value travels through a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Application value -> persisted form, before writing
    Outbound,
    /// Persisted form -> application value, after reading
    Inbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outbound => f.write_str("outbound"),
            Direction::Inbound => f.write_str("inbound"),
        }
    }
}

/// Transcoding errors
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("format \"{0}\" not supported")]
    UnsupportedFormat(String),

    #[error("malformed {format} input: {reason}")]
    MalformedInput { format: &'static str, reason: String },

    #[error("data corrupted | {reason}\n{value}")]
    DataCorrupted { value: Box<Value>, reason: String },

    #[error("{direction} transform for {format} is not implemented")]
    NotImplemented {
        format: &'static str,
        direction: Direction,
    },

    #[error("remote document service failed: {0}")]
    Remote(#[from] RemoteError),
}

impl FormatError {
    pub fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        FormatError::MalformedInput {
            format,
            reason: reason.into(),
        }
    }

    pub fn data_corrupted(value: &Value, reason: impl Into<String>) -> Self {
        FormatError::DataCorrupted {
            value: Box::new(value.clone()),
            reason: reason.into(),
        }
    }

    pub fn not_implemented(format: &'static str, direction: Direction) -> Self {
        FormatError::NotImplemented { format, direction }
    }
}

/// Conversion rules for one external representation.
///
/// Handlers hold only immutable options, so one instance can serve any
/// number of concurrent calls. Arguments are borrowed for the duration of
/// the call and never retained.
pub trait FormatHandler: Send + Sync {
    /// Human readable format name, e.g. "json"
    fn name(&self) -> &'static str;

    /// Media type of the persisted form
    fn content_type(&self) -> mime::Mime;

    /// Convert an application value into its persisted form
    fn outbound(&self, value: &Value) -> Result<Value, FormatError>;

    /// Convert a persisted form back into an application value
    fn inbound(&self, raw: &Value) -> Result<Value, FormatError>;
}

/// Borrow textual input from a `String` or UTF-8 `Bytes` value.
pub(crate) fn text_input<'a>(format: &'static str, raw: &'a Value) -> Result<&'a str, FormatError> {
    match raw {
        Value::String(s) => Ok(s),
        Value::Bytes(b) => std::str::from_utf8(b)
            .map_err(|e| FormatError::malformed(format, format!("input is not UTF-8: {e}"))),
        other => Err(FormatError::malformed(
            format,
            format!("expected text, got {}", other.kind()),
        )),
    }
}
