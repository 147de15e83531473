//! `copyforge blocks`: Inspect the prompt blocks in effect.

use super::load_overrides;
use anyhow::{Result, bail};
use copyforge_config::AppConfig;
use copyforge_core::block::BlockSource;
use copyforge_prompts::{DefaultBlocks, OverrideMap, resolve};
use std::collections::BTreeSet;
use std::path::Path;

pub fn list(overrides: Option<&Path>) -> Result<()> {
    let config = AppConfig::load()?;
    let overrides = load_overrides(overrides, &config)?;
    for line in listing(&overrides, &DefaultBlocks::builtin()) {
        println!("{line}");
    }
    Ok(())
}

pub fn show(key: &str, overrides: Option<&Path>) -> Result<()> {
    let config = AppConfig::load()?;
    let overrides = load_overrides(overrides, &config)?;
    let record = resolve(key, &overrides, &DefaultBlocks::builtin());
    if record.source == BlockSource::Missing {
        bail!("no override or default text for block `{key}`");
    }
    println!("{}", record.content);
    Ok(())
}

/// One `key  source  chars` line per key known to either table, sorted.
pub fn listing(overrides: &OverrideMap, defaults: &DefaultBlocks) -> Vec<String> {
    let keys: BTreeSet<&str> = defaults.keys().chain(overrides.keys()).collect();
    let width = keys.iter().map(|k| k.len()).max().unwrap_or(0);

    keys.into_iter()
        .map(|key| {
            let record = resolve(key, overrides, defaults);
            let source = match record.source {
                BlockSource::Override => "override",
                BlockSource::Default => "default",
                BlockSource::Missing => "missing",
            };
            format!(
                "{key:<width$}  {source:<8}  {}",
                record.content.chars().count()
            )
        })
        .collect()
}
