//! The prompt preview payload.
//!
//! This is the shape an "explain this prompt" view renders, so field names
//! are stable. The `debug` key is omitted entirely when debugging is off.

use crate::context::WindowTrace;
use crate::context::draft::DRAFT_SUMMARY_THRESHOLD;
use copyforge_core::block::PromptBlockRecord;
use copyforge_core::limits::WindowLimits;
use copyforge_core::message::HistoryMessage;
use copyforge_core::thread::ThreadContext;
use copyforge_prompts::SectionStat;
use copyforge_prompts::composer::{RESEARCH_EXCERPT_MAX_CHARS, SWIPE_TRANSCRIPT_MAX_CHARS};
use serde::{Deserialize, Serialize};

/// `{ prompt, debug? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPreview {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<PreviewDebug>,
}

/// Everything that went into the prompt and the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewDebug {
    pub thread_context: ThreadContext,
    pub prompt_blocks: Vec<PromptBlockRecord>,
    pub prompt_sections: Vec<SectionStat>,
    pub context_window: WindowTrace,
    pub context_messages: Vec<HistoryMessage>,
    pub runtime_limits: RuntimeLimits,
}

/// Window limits plus the fixed caps applied during composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeLimits {
    #[serde(flatten)]
    pub window: WindowLimits,
    pub swipe_transcript_chars: usize,
    pub research_excerpt_chars: usize,
    pub draft_summary_threshold: usize,
}

impl RuntimeLimits {
    pub fn new(window: WindowLimits) -> Self {
        Self {
            window,
            swipe_transcript_chars: SWIPE_TRANSCRIPT_MAX_CHARS,
            research_excerpt_chars: RESEARCH_EXCERPT_MAX_CHARS,
            draft_summary_threshold: DRAFT_SUMMARY_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_key_absent_when_off() {
        let preview = PromptPreview {
            prompt: "hi".into(),
            debug: None,
        };
        let json = serde_json::to_value(&preview).unwrap();
        assert_eq!(json, serde_json::json!({ "prompt": "hi" }));
    }

    #[test]
    fn runtime_limits_flatten_window_fields() {
        let json = serde_json::to_value(RuntimeLimits::new(WindowLimits::default())).unwrap();
        assert_eq!(json["max_messages"], 14);
        assert_eq!(json["max_chars"], 24_000);
        assert_eq!(json["max_chars_per_message"], 6_000);
        assert_eq!(json["preview_chars"], 220);
        assert_eq!(json["swipe_transcript_chars"], 7_000);
        assert_eq!(json["research_excerpt_chars"], 1_200);
        assert_eq!(json["draft_summary_threshold"], 1_800);
    }
}
