use std::collections::BTreeMap;

use super::traits::{Direction, FormatError, FormatHandler, text_input};
use crate::value::{Value, ValueMap};

/// Section whose options every other section inherits
pub const DEFAULT_SECTION: &str = "DEFAULT";

const MAX_INTERPOLATION_DEPTH: usize = 10;

type Options = BTreeMap<String, String>;

/// Section-based config handler (`.ini`)
///
/// Inbound parses `[section]` / `option = value` text into a two-level map
/// of strings. Option names keep their case. Writing section config is not
/// supported; outbound always fails with `NotImplemented`.
#[derive(Debug, Clone)]
pub struct IniHandler {
    interpolation: bool,
}

impl IniHandler {
    pub fn new() -> Self {
        Self {
            interpolation: true,
        }
    }

    /// Toggle `%(name)s` substitution in option values
    pub fn with_interpolation(mut self, enabled: bool) -> Self {
        self.interpolation = enabled;
        self
    }

    fn resolve(&self, document: Document) -> Result<ValueMap, String> {
        let mut out = ValueMap::new();

        for (section, own) in document.sections {
            let mut merged = document.defaults.clone();
            merged.extend(own);

            let mut options = ValueMap::new();
            for (option, raw) in &merged {
                let value = if self.interpolation {
                    let mut expanded = String::new();
                    interpolate(option, raw, &merged, 1, &mut expanded)
                        .map_err(|e| format!("[{section}] {e}"))?;
                    expanded
                } else {
                    raw.clone()
                };
                options.insert(option.clone(), Value::String(value));
            }

            out.insert(section, Value::Map(options));
        }

        Ok(out)
    }
}

impl Default for IniHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatHandler for IniHandler {
    fn name(&self) -> &'static str {
        "ini"
    }

    fn content_type(&self) -> mime::Mime {
        mime::TEXT_PLAIN_UTF_8
    }

    fn outbound(&self, _value: &Value) -> Result<Value, FormatError> {
        Err(FormatError::not_implemented(self.name(), Direction::Outbound))
    }

    fn inbound(&self, raw: &Value) -> Result<Value, FormatError> {
        let text = text_input(self.name(), raw)?;
        let document = parse(text).map_err(|e| FormatError::malformed(self.name(), e))?;
        let sections = self
            .resolve(document)
            .map_err(|e| FormatError::malformed(self.name(), e))?;
        Ok(Value::Map(sections))
    }
}

/// Raw parse result, before defaults and interpolation are applied
#[derive(Debug, Default)]
struct Document {
    defaults: Options,
    sections: BTreeMap<String, Options>,
}

fn parse(text: &str) -> Result<Document, String> {
    let mut document = Document::default();
    // None until the first header; Some(None) while inside [DEFAULT]
    let mut section: Option<Option<String>> = None;
    let mut last_option: Option<String> = None;

    for (index, line) in text.lines().enumerate() {
        let lineno = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            last_option = None;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        let mut options = match &section {
            Some(Some(name)) => document.sections.get_mut(name),
            Some(None) => Some(&mut document.defaults),
            None => None,
        };

        // Indented line continues the previous value, if there is one
        if line.starts_with([' ', '\t']) {
            let target = match (options.as_mut(), &last_option) {
                (Some(options), Some(option)) => options.get_mut(option),
                _ => None,
            };
            if let Some(value) = target {
                value.push('\n');
                value.push_str(trimmed);
                continue;
            }
        }

        if let Some(name) = section_header(trimmed) {
            last_option = None;
            if name == DEFAULT_SECTION {
                section = Some(None);
                continue;
            }
            if document.sections.contains_key(name) {
                return Err(format!("line {lineno}: section '{name}' already exists"));
            }
            document.sections.insert(name.to_string(), Options::new());
            section = Some(Some(name.to_string()));
            continue;
        }

        let Some(options) = options else {
            return Err(format!("line {lineno}: option found before any section header"));
        };

        let Some(split) = trimmed.find(['=', ':']) else {
            return Err(format!("line {lineno}: expected 'option = value'"));
        };
        let option = trimmed[..split].trim();
        let value = trimmed[split + 1..].trim();

        if option.is_empty() {
            return Err(format!("line {lineno}: empty option name"));
        }
        if options.contains_key(option) {
            return Err(format!("line {lineno}: option '{option}' already exists"));
        }

        options.insert(option.to_string(), value.to_string());
        last_option = Some(option.to_string());
    }

    Ok(document)
}

/// Name between `[` and the last `]`, if the line is a header
fn section_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?;
    let end = inner.rfind(']')?;
    let name = &inner[..end];
    (!name.is_empty()).then_some(name)
}

/// Expand `%(name)s` references and `%%` escapes into `out`
fn interpolate(
    option: &str,
    raw: &str,
    vars: &Options,
    depth: usize,
    out: &mut String,
) -> Result<(), String> {
    if depth > MAX_INTERPOLATION_DEPTH {
        return Err(format!(
            "interpolation of '{option}' nested deeper than {MAX_INTERPOLATION_DEPTH} levels"
        ));
    }

    let mut rest = raw;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if let Some(tail) = rest.strip_prefix("%%") {
            out.push('%');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("%(") {
            let end = tail
                .find(")s")
                .ok_or_else(|| format!("bad interpolation reference {rest:?} in '{option}'"))?;
            let name = &tail[..end];
            let replacement = vars
                .get(name)
                .ok_or_else(|| format!("'{option}' references missing option '{name}'"))?;
            if replacement.contains('%') {
                interpolate(option, replacement, vars, depth + 1, out)?;
            } else {
                out.push_str(replacement);
            }
            rest = &tail[end + 2..];
        } else {
            return Err(format!("'%' in '{option}' must be followed by '%' or '('"));
        }
    }
    out.push_str(rest);

    Ok(())
}
