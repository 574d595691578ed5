use super::traits::{FormatError, FormatHandler};
use crate::value::Value;

/// Plain-text handler (`.txt`)
///
/// Both directions coerce to the display-string form and never fail.
#[derive(Debug, Clone, Default)]
pub struct TextHandler;

impl TextHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for TextHandler {
    fn name(&self) -> &'static str {
        "text"
    }

    fn content_type(&self) -> mime::Mime {
        mime::TEXT_PLAIN_UTF_8
    }

    fn outbound(&self, value: &Value) -> Result<Value, FormatError> {
        Ok(Value::String(value.to_display_string()))
    }

    fn inbound(&self, raw: &Value) -> Result<Value, FormatError> {
        Ok(Value::String(raw.to_display_string()))
    }
}
