use serde::Serialize;
use std::fmt;

use super::traits::{FormatError, FormatHandler, text_input};
use crate::value::Value;

pub const DEFAULT_INDENT: usize = 4;

/// Structured key/value handler (`.json`)
///
/// Outbound pretty-prints with a fixed indent and sorted keys, so the same
/// value always produces the same bytes.
#[derive(Debug, Clone)]
pub struct JsonHandler {
    indent: usize,
    degrade_non_finite: bool,
}

impl JsonHandler {
    pub fn new() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            degrade_non_finite: false,
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Write `{}` instead of failing when the value holds NaN or infinity.
    ///
    /// Only meant for stores that already contain documents written this way.
    pub fn degrade_non_finite(mut self, enabled: bool) -> Self {
        self.degrade_non_finite = enabled;
        self
    }

    /// Serialise `value` to JSON text
    pub fn to_text(&self, value: &Value) -> Result<String, FormatError> {
        let json = match encode(value) {
            Ok(json) => json,
            Err(issue) if issue.kind == IssueKind::NonFinite && self.degrade_non_finite => {
                tracing::warn!(%issue, "Substituting empty mapping for unencodable JSON value");
                return Ok("{}".to_string());
            }
            Err(issue) => return Err(FormatError::data_corrupted(value, issue.to_string())),
        };

        self.render(value, &json)
    }

    fn render(&self, value: &Value, json: &serde_json::Value) -> Result<String, FormatError> {
        let indent = vec![b' '; self.indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        json.serialize(&mut serializer)
            .map_err(|e| FormatError::data_corrupted(value, e.to_string()))?;
        String::from_utf8(buf).map_err(|e| FormatError::data_corrupted(value, e.to_string()))
    }
}

impl Default for JsonHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatHandler for JsonHandler {
    fn name(&self) -> &'static str {
        "json"
    }

    fn content_type(&self) -> mime::Mime {
        mime::APPLICATION_JSON
    }

    fn outbound(&self, value: &Value) -> Result<Value, FormatError> {
        self.to_text(value).map(Value::String)
    }

    fn inbound(&self, raw: &Value) -> Result<Value, FormatError> {
        let text = text_input(self.name(), raw)?;
        let parsed: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| FormatError::malformed(self.name(), e.to_string()))?;
        Ok(Value::from(parsed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IssueKind {
    NonFinite,
    Binary,
}

#[derive(Debug)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Why a value could not be expressed as JSON, and where
#[derive(Debug)]
struct EncodeIssue {
    kind: IssueKind,
    /// Innermost segment first; filled in while unwinding
    path: Vec<Segment>,
}

impl EncodeIssue {
    fn new(kind: IssueKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }

    fn at(mut self, segment: Segment) -> Self {
        self.path.push(segment);
        self
    }
}

impl fmt::Display for EncodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IssueKind::NonFinite => f.write_str("non-finite float")?,
            IssueKind::Binary => f.write_str("binary content is not JSON serializable")?,
        }
        f.write_str(" at $")?;
        for segment in self.path.iter().rev() {
            match segment {
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

fn encode(value: &Value) -> Result<serde_json::Value, EncodeIssue> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(x) => serde_json::Number::from_f64(*x)
            .map(serde_json::Value::Number)
            .ok_or_else(|| EncodeIssue::new(IssueKind::NonFinite))?,
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(_) => return Err(EncodeIssue::new(IssueKind::Binary)),
        Value::List(items) => serde_json::Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| encode(item).map_err(|e| e.at(Segment::Index(index))))
                .collect::<Result<_, _>>()?,
        ),
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(key, item)| {
                    encode(item)
                        .map(|json| (key.clone(), json))
                        .map_err(|e| e.at(Segment::Key(key.clone())))
                })
                .collect::<Result<_, _>>()?,
        ),
    })
}
