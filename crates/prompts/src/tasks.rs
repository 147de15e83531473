//! Single-block task prompts.
//!
//! The research organizer, swipe summarizer and research synthesis calls
//! each use one resolved block with its own tokens (`{{items}}`,
//! `{{extract}}`, `{{title}}`, `{{product}}`). They share the resolver and
//! the substitution rule with the conversational composer.

use crate::composer::{RESEARCH_EXCERPT_MAX_CHARS, SWIPE_TRANSCRIPT_MAX_CHARS};
use crate::defaults::{DefaultBlocks, keys};
use crate::resolver::{OverrideMap, resolve};
use crate::template::{TemplateVars, substitute};
use copyforge_core::block::PromptBlockRecord;
use copyforge_core::text::{char_len, take_chars};
use copyforge_core::thread::{Product, ResearchItem, Swipe};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A rendered task prompt and the block it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPrompt {
    /// Empty when the block is missing.
    pub text: String,
    pub block: PromptBlockRecord,
}

impl TaskPrompt {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Composer for the single-block task prompts.
pub struct TaskComposer<'a> {
    overrides: &'a OverrideMap,
    defaults: &'a DefaultBlocks,
}

impl<'a> TaskComposer<'a> {
    pub fn new(overrides: &'a OverrideMap, defaults: &'a DefaultBlocks) -> Self {
        Self {
            overrides,
            defaults,
        }
    }

    /// Prompt that groups research items into usable themes.
    pub fn research_organizer(&self, items: &[ResearchItem]) -> TaskPrompt {
        let vars = TemplateVars::new().with("items", numbered_items(items, false));
        self.render(keys::RESEARCH_ORGANIZER, &vars)
    }

    /// Prompt that names and summarizes a reference swipe.
    pub fn swipe_summary(&self, swipe: &Swipe) -> TaskPrompt {
        let extract = swipe
            .transcript
            .as_deref()
            .map(|t| take_chars(t.trim(), SWIPE_TRANSCRIPT_MAX_CHARS))
            .unwrap_or_default();
        let title = swipe
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled swipe");
        let vars = TemplateVars::new()
            .with("extract", extract)
            .with("title", title);
        self.render(keys::SWIPE_SUMMARY, &vars)
    }

    /// Prompt that distills research into copy-ready insights.
    pub fn research_synthesis(&self, product: &Product, items: &[ResearchItem]) -> TaskPrompt {
        let vars = TemplateVars::new()
            .with("items", numbered_items(items, true))
            .with("product", product.name.trim());
        self.render(keys::RESEARCH_SYNTHESIS, &vars)
    }

    fn render(&self, key: &str, vars: &TemplateVars) -> TaskPrompt {
        let block = resolve(key, self.overrides, self.defaults);
        let text = if block.is_empty() {
            String::new()
        } else {
            substitute(block.content.trim(), vars)
        };
        debug!(key, source = ?block.source, prompt_len = char_len(&text), "Rendered task prompt");
        TaskPrompt { text, block }
    }
}

/// `1. Title: summary` lines, optionally followed by a content excerpt.
fn numbered_items(items: &[ResearchItem], with_excerpt: bool) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mut line = format!("{}. {}", i + 1, item.title.trim());
            if let Some(summary) = item.summary.as_deref().map(str::trim) {
                if !summary.is_empty() {
                    line.push_str(": ");
                    line.push_str(summary);
                }
            }
            let content = item.content.trim();
            if with_excerpt && !content.is_empty() {
                line.push('\n');
                line.push_str(take_chars(content, RESEARCH_EXCERPT_MAX_CHARS));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
