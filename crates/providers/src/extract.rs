//! Text extraction from heterogeneous completion payloads.
//!
//! Upstream models behind the gateway do not agree on a response shape. The
//! payload is classified into a [`CompletionShape`] with fixed precedence and
//! the text is read from whichever field that shape names.

use serde_json::Value;

/// The recognised completion layouts, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionShape<'a> {
    /// OpenAI chat layout: `choices[0].message.content`
    Chat(&'a Value),
    /// Top-level `content`
    Content(&'a Value),
    /// Top-level `text`
    Text(&'a Value),
    /// Anything else; the whole payload is stringified
    Other(&'a Value),
    /// Null, false, zero, or an empty string, array or object
    Empty,
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Strings come back as-is, null as empty, everything else as JSON text.
fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl<'a> CompletionShape<'a> {
    pub fn classify(payload: &'a Value) -> Self {
        if is_blank(payload) {
            return Self::Empty;
        }
        if let Some(content) = payload
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
        {
            return Self::Chat(content);
        }
        if let Some(content) = payload.get("content") {
            return Self::Content(content);
        }
        if let Some(text) = payload.get("text") {
            return Self::Text(text);
        }
        Self::Other(payload)
    }

    pub fn text(&self) -> String {
        match self {
            Self::Chat(v) | Self::Content(v) | Self::Text(v) | Self::Other(v) => render(v),
            Self::Empty => String::new(),
        }
    }
}

/// Plain text of a completion payload. Total: never fails.
pub fn extract_text(payload: &Value) -> String {
    CompletionShape::classify(payload).text()
}
