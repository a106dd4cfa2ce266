//! Loading chat exports and bounding them by date.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::path::Path;

use crate::message::ChatExport;

pub fn load_chat_export(path: &Path) -> Result<ChatExport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read chat export {}", path.display()))?;
    let export: ChatExport = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse chat export {}", path.display()))?;
    Ok(export)
}

/// Inclusive date bounds; an unset side is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        if self.start.map_or(false, |start| ts < start) {
            return false;
        }
        if self.end.map_or(false, |end| ts > end) {
            return false;
        }
        true
    }
}
