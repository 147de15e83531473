//! Block resolution with three-tier fallback.
//!
//! A key resolves to the persisted override when it has text, then to the
//! built-in default, and otherwise to an empty `missing` record. An empty
//! resolution is not an error; composers simply omit the section.

use crate::defaults::DefaultBlocks;
use copyforge_core::block::{BlockSource, PromptBlockRecord, PromptBlockRow};
use std::collections::HashMap;
use tracing::debug;

/// Active overrides keyed by logical key, one row per key.
#[derive(Debug, Clone, Default)]
pub struct OverrideMap {
    rows: HashMap<String, PromptBlockRow>,
}

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reduce raw rows to one active row per logical key.
    ///
    /// Inactive rows are dropped. The most recently updated row wins;
    /// rows without a timestamp rank after timestamped ones and keep
    /// their input order among themselves.
    pub fn from_rows(rows: impl IntoIterator<Item = PromptBlockRow>) -> Self {
        let mut active: Vec<PromptBlockRow> = rows.into_iter().filter(|r| r.active).collect();
        active.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let mut map = HashMap::new();
        for row in active {
            let key = row.logical_key().to_string();
            if key.is_empty() {
                continue;
            }
            map.entry(key).or_insert(row);
        }
        Self { rows: map }
    }

    pub fn get(&self, key: &str) -> Option<&PromptBlockRow> {
        self.rows.get(key)
    }

    /// All keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Resolve one key against overrides, then defaults.
pub fn resolve(key: &str, overrides: &OverrideMap, defaults: &DefaultBlocks) -> PromptBlockRecord {
    if let Some(row) = overrides.get(key) {
        if !row.content.trim().is_empty() {
            return PromptBlockRecord {
                key: key.to_string(),
                source: BlockSource::Override,
                origin_id: Some(row.id.clone()),
                kind: Some(row.kind.clone()),
                content: row.content.clone(),
            };
        }
    }

    if let Some(content) = defaults.get(key) {
        if !content.trim().is_empty() {
            return PromptBlockRecord {
                key: key.to_string(),
                source: BlockSource::Default,
                origin_id: None,
                kind: None,
                content: content.to_string(),
            };
        }
    }

    debug!(key, "Prompt block has no override or default");
    PromptBlockRecord::missing(key)
}

/// Resolver for a single composition pass.
///
/// Records every key it resolves, once, in first-resolution order.
pub struct BlockResolver<'a> {
    overrides: &'a OverrideMap,
    defaults: &'a DefaultBlocks,
    trace: Vec<PromptBlockRecord>,
}

impl<'a> BlockResolver<'a> {
    pub fn new(overrides: &'a OverrideMap, defaults: &'a DefaultBlocks) -> Self {
        Self {
            overrides,
            defaults,
            trace: Vec::new(),
        }
    }

    pub fn resolve(&mut self, key: &str) -> PromptBlockRecord {
        let record = resolve(key, self.overrides, self.defaults);
        if !self.trace.iter().any(|r| r.key == record.key) {
            self.trace.push(record.clone());
        }
        record
    }

    pub fn trace(&self) -> &[PromptBlockRecord] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<PromptBlockRecord> {
        self.trace
    }
}
