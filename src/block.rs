//! Message blocks and their JSON encoding.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One structural unit of a chat message.
///
/// Serializes as an object discriminated by `type`:
/// `{"type":"text","value":..}`, `{"type":"code","value":..}` (with
/// `language` only when set) and `{"type":"bullets","blocks":[..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageBlock {
    /// Rich markup text.
    Text { value: String },
    /// Preformatted code, reproduced verbatim.
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        value: String,
    },
    /// Flat list of blocks, one bullet each.
    Bullets { blocks: Vec<MessageBlock> },
}

impl MessageBlock {
    pub fn text(value: impl Into<String>) -> Self {
        MessageBlock::Text {
            value: value.into(),
        }
    }

    pub fn code(value: impl Into<String>, language: Option<String>) -> Self {
        MessageBlock::Code {
            language,
            value: value.into(),
        }
    }

    pub fn bullets(blocks: Vec<MessageBlock>) -> Self {
        MessageBlock::Bullets { blocks }
    }

    /// Returns the `type` discriminant used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            MessageBlock::Text { .. } => "text",
            MessageBlock::Code { .. } => "code",
            MessageBlock::Bullets { .. } => "bullets",
        }
    }
}

/// Message payload handed to the chat platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub blocks: Vec<MessageBlock>,
}

impl Message {
    pub fn new(blocks: Vec<MessageBlock>) -> Self {
        Self { blocks }
    }
}

impl From<Vec<MessageBlock>> for Message {
    fn from(blocks: Vec<MessageBlock>) -> Self {
        Self::new(blocks)
    }
}

/// Encodes value as compact JSON without HTML escaping.
///
/// Block values embed literal `<b>` and `<link ...>` tags, so `<`, `>`,
/// `&` and `/` must reach the wire unchanged. serde_json's default
/// formatter only escapes quotes, backslashes and control characters,
/// which is exactly the contract required here. This is unrelated to
/// [`crate::markup::escaped_string`], which protects markup syntax.
///
/// # Errors
///
/// Returns error if the value cannot be represented as JSON
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).context("Failed to encode message as JSON")
}

/// Encodes value as indented JSON without HTML escaping.
///
/// # Errors
///
/// Returns error if the value cannot be represented as JSON
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to encode message as JSON")
}
