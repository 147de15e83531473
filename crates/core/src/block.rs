//! Prompt block rows and resolution records.
//!
//! A prompt block is a named fragment of instruction text. Persisted
//! overrides arrive as [`PromptBlockRow`]s from the storage collaborator;
//! every resolution produces a [`PromptBlockRecord`] that says where the
//! text came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted, user-editable prompt block as supplied by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptBlockRow {
    /// Row identifier
    pub id: String,

    /// Block category (e.g. `agent_system`, `skill`)
    pub kind: String,

    /// The instruction text
    pub content: String,

    /// Explicit logical key from the row's metadata, if tagged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_key: Option<String>,

    /// Inactive rows are ignored
    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl PromptBlockRow {
    /// The key this row overrides: the metadata tag when present and
    /// non-blank, otherwise the row's category.
    pub fn logical_key(&self) -> &str {
        match self.metadata_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => self.kind.trim(),
        }
    }
}

/// Where a resolved block's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockSource {
    Override,
    Default,
    Missing,
}

/// The outcome of resolving one logical key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptBlockRecord {
    pub key: String,
    pub source: BlockSource,
    /// Override row id; `None` for defaults and missing blocks.
    pub origin_id: Option<String>,
    pub kind: Option<String>,
    pub content: String,
}

impl PromptBlockRecord {
    pub fn missing(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            source: BlockSource::Missing,
            origin_id: None,
            kind: None,
            content: String::new(),
        }
    }

    /// True when the block resolved to no usable text.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
