//! `copyforge preview`: Compose a turn offline and print its preview.

use super::load_overrides;
use anyhow::{Context, Result};
use copyforge_agent::{TurnInput, prepare_turn};
use copyforge_config::AppConfig;
use copyforge_core::limits::WindowLimits;
use copyforge_core::thread::ThreadContext;
use copyforge_prompts::{DefaultBlocks, OverrideMap};
use serde_json::Value;
use std::path::Path;

pub fn run(input: &Path, overrides: Option<&Path>, debug: bool, pretty: bool) -> Result<()> {
    let config = AppConfig::load()?;
    let overrides = load_overrides(overrides, &config)?;

    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read turn input from {}", input.display()))?;
    let output = render(
        &raw,
        &overrides,
        &config.window_limits(),
        debug || config.preview.debug,
        pretty,
    )?;

    println!("{output}");
    Ok(())
}

/// Any JSON integer as an `i64`, saturating counts too large to fit.
fn raw_count(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_u64().map(|_| i64::MAX))
}

/// Parse a turn, clamp its version count, and render the preview JSON.
pub fn render(
    raw: &str,
    overrides: &OverrideMap,
    limits: &WindowLimits,
    debug: bool,
    pretty: bool,
) -> Result<String> {
    let mut value: Value = serde_json::from_str(raw).context("turn input is not valid JSON")?;
    if let Some(versions) = value.pointer_mut("/thread/versions") {
        if let Some(count) = raw_count(versions) {
            *versions = Value::from(ThreadContext::clamp_versions(count));
        }
    }
    let input: TurnInput =
        serde_json::from_value(value).context("turn input has an unexpected shape")?;

    let turn = prepare_turn(&input, overrides, &DefaultBlocks::builtin(), limits)?;
    tracing::info!(
        sections = turn.prompt.sections.len(),
        messages = turn.window.trace.selected_messages,
        dropped = turn.window.trace.dropped_messages,
        "Composed preview"
    );

    let preview = turn.preview(debug);
    let json = if pretty {
        serde_json::to_string_pretty(&preview)?
    } else {
        serde_json::to_string(&preview)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TURN: &str = r#"{
        "thread": { "skill": "hooks", "versions": 9 },
        "product": { "name": "GlowSerum", "content": "Vitamin C serum" },
        "history": [
            { "role": "user", "content": "Give me hooks" },
            { "role": "system", "content": "internal note" }
        ]
    }"#;

    fn render_json(debug: bool) -> Value {
        let out = render(
            TURN,
            &OverrideMap::new(),
            &WindowLimits::default(),
            debug,
            false,
        )
        .unwrap();
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn versions_are_clamped_before_composing() {
        let json = render_json(true);
        assert_eq!(json["debug"]["thread_context"]["versions"], 6);
        assert!(json["prompt"].as_str().unwrap().contains("## Version 6"));
    }

    #[test]
    fn debug_flag_controls_payload() {
        assert!(render_json(false).get("debug").is_none());

        let json = render_json(true);
        assert_eq!(json["debug"]["context_window"]["candidate_messages"], 1);
        assert_eq!(json["debug"]["context_window"]["ineligible_messages"], 1);
    }

    fn clamped_versions(raw_versions: &str) -> Value {
        let turn = format!(r#"{{"thread":{{"skill":"hooks","versions":{raw_versions}}}}}"#);
        let out = render(&turn, &OverrideMap::new(), &WindowLimits::default(), true, false)
            .unwrap();
        let json: Value = serde_json::from_str(&out).unwrap();
        json["debug"]["thread_context"]["versions"].clone()
    }

    #[test]
    fn negative_and_oversized_counts_are_clamped() {
        assert_eq!(clamped_versions("-2"), 1);
        assert_eq!(clamped_versions("0"), 1);
        assert_eq!(clamped_versions("300"), 6);
        assert_eq!(clamped_versions("18446744073709551615"), 6);
        assert_eq!(clamped_versions("4"), 4);
    }

    #[test]
    fn non_integer_count_is_rejected() {
        let err = render(
            r#"{"thread":{"skill":"hooks","versions":"many"}}"#,
            &OverrideMap::new(),
            &WindowLimits::default(),
            false,
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unexpected shape"));
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = render("{", &OverrideMap::new(), &WindowLimits::default(), false, false)
            .unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
