pub mod blocks;
pub mod config_cmd;
pub mod preview;

use anyhow::{Context, Result};
use copyforge_config::AppConfig;
use copyforge_core::block::PromptBlockRow;
use copyforge_prompts::OverrideMap;
use std::path::Path;

/// Read a JSON array of prompt block rows and reduce it to one row per key.
pub fn read_overrides(path: &Path) -> Result<OverrideMap> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read overrides from {}", path.display()))?;
    let rows: Vec<PromptBlockRow> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse overrides in {}", path.display()))?;
    let total = rows.len();
    let overrides = OverrideMap::from_rows(rows);
    tracing::debug!(rows = total, keys = overrides.len(), "Loaded prompt block overrides");
    Ok(overrides)
}

/// Overrides from the explicit path, else the configured file, else none.
pub fn load_overrides(explicit: Option<&Path>, config: &AppConfig) -> Result<OverrideMap> {
    match explicit.or(config.blocks.overrides_file.as_deref()) {
        Some(path) => read_overrides(path),
        None => Ok(OverrideMap::new()),
    }
}
