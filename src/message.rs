//! Chat export records.
//!
//! Exports store a message's `text` either as a plain string or as a list of
//! fragments, where each fragment is a string or a formatted entity such as
//! `{"type": "bold", "text": "BUSD_ETH"}`. Both shapes are normalized behind
//! [`PlainText`] so the extractor never sees the difference.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatExport {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub text: Option<MessageBody>,
}

impl ChatMessage {
    /// Parsed `date`, or `None` when it is absent or not in [`DATE_FORMAT`].
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.date.as_deref()?;
        NaiveDateTime::parse_from_str(raw, DATE_FORMAT).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    Plain(String),
    Fragments(Vec<TextFragment>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextFragment {
    Plain(String),
    Entity(TextEntity),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEntity {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

impl TextFragment {
    pub fn text(&self) -> &str {
        match self {
            TextFragment::Plain(s) => s,
            TextFragment::Entity(e) => &e.text,
        }
    }
}

/// Capability every message body variant provides to the extractor.
pub trait PlainText {
    /// Full text content with formatting stripped.
    fn as_plain_text(&self) -> String;

    /// Trailing segment of the raw body, where the deal duration lives.
    fn trailing_text(&self) -> &str;
}

impl PlainText for str {
    fn as_plain_text(&self) -> String {
        self.to_string()
    }

    fn trailing_text(&self) -> &str {
        let trimmed = self.trim_end();
        match trimmed.rfind('\n') {
            Some(idx) => &trimmed[idx + 1..],
            None => trimmed,
        }
    }
}

impl PlainText for MessageBody {
    fn as_plain_text(&self) -> String {
        match self {
            MessageBody::Plain(s) => s.clone(),
            MessageBody::Fragments(parts) => parts.iter().map(TextFragment::text).collect(),
        }
    }

    fn trailing_text(&self) -> &str {
        match self {
            MessageBody::Plain(s) => s.as_str().trailing_text(),
            MessageBody::Fragments(parts) => parts.last().map(TextFragment::text).unwrap_or(""),
        }
    }
}

impl From<&str> for MessageBody {
    fn from(s: &str) -> Self {
        MessageBody::Plain(s.to_string())
    }
}
