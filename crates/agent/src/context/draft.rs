//! Collapses large earlier drafts before they enter the window.
//!
//! An assistant reply that carries a long fenced `draft` block is replaced
//! with a short placeholder naming the versions it contained, so history
//! accounting reflects what the model is shown instead of re-sending
//! every earlier draft in full.

use copyforge_core::message::{HistoryMessage, Role};
use copyforge_core::text::char_len;
use regex_lite::Regex;
use std::sync::LazyLock;

/// Messages shorter than this are never summarized.
pub const DRAFT_SUMMARY_THRESHOLD: usize = 1_800;

/// First line of every placeholder.
pub const DRAFT_PLACEHOLDER_HEADER: &str = "[Earlier draft omitted from context]";

static DRAFT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```draft[ \t]*\r?\n(.*?)(?:```|\z)").expect("draft block pattern is valid")
});

static VERSION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*##[ \t]*Version[ \t]+([0-9]+)").expect("version heading pattern is valid")
});

/// Replace a large assistant draft with its placeholder.
///
/// Returns the message unchanged when it is not from the assistant, is
/// under [`DRAFT_SUMMARY_THRESHOLD`] characters, or has no draft block.
/// A draft with no closing fence runs to the end of the message.
pub fn summarize_if_large(message: HistoryMessage) -> HistoryMessage {
    if message.role != Role::Assistant || char_len(&message.content) < DRAFT_SUMMARY_THRESHOLD {
        return message;
    }

    let Some(range) = DRAFT_BLOCK
        .captures(&message.content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.range())
    else {
        return message;
    };
    let body = &message.content[range];

    let numbers: Vec<&str> = VERSION_HEADING
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();
    let listed = if numbers.is_empty() {
        "none".to_string()
    } else {
        numbers.join(", ")
    };

    let content = format!(
        "{DRAFT_PLACEHOLDER_HEADER}\nversions: {listed}\ndraft_chars: {}",
        char_len(body)
    );

    HistoryMessage { content, ..message }
}

/// Apply [`summarize_if_large`] to every message, preserving order.
pub fn summarize_history(history: Vec<HistoryMessage>) -> Vec<HistoryMessage> {
    history.into_iter().map(summarize_if_large).collect()
}
