//! Decoded `tools/call` results.

use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    Text(String),
    /// Any non-text block, kept as compact JSON.
    Opaque(String),
}

impl ContentItem {
    fn from_block(block: &Value) -> Self {
        let is_text = block
            .get("type")
            .and_then(Value::as_str)
            .map(|kind| kind.eq_ignore_ascii_case("text"))
            .unwrap_or(false);
        match block.get("text").and_then(Value::as_str) {
            Some(text) if is_text => ContentItem::Text(text.to_string()),
            _ => ContentItem::Opaque(stringify(block)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContentItem::Text(text) | ContentItem::Opaque(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolPayload {
    Items(Vec<ContentItem>),
    Opaque(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub payload: ToolPayload,
    /// Host flagged the call as failed. The round trip itself still succeeded.
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            payload: ToolPayload::Items(vec![ContentItem::Text(text.into())]),
            is_error: false,
        }
    }

    pub fn from_response(result: &Value) -> Self {
        let is_error = result
            .get("isError")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let payload = match result.get("content").and_then(Value::as_array) {
            Some(blocks) => ToolPayload::Items(blocks.iter().map(ContentItem::from_block).collect()),
            None => ToolPayload::Opaque(stringify(result)),
        };
        Self { payload, is_error }
    }

    /// Text fed back to the model: `[a, b]` for content lists.
    pub fn render(&self) -> String {
        match &self.payload {
            ToolPayload::Items(items) => {
                let joined = items
                    .iter()
                    .map(ContentItem::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{joined}]")
            }
            ToolPayload::Opaque(text) => text.clone(),
        }
    }
}

impl fmt::Display for ToolResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
