//! System prompt composition.
//!
//! Builds the conversational system prompt from resolved blocks and the
//! thread's entities. Sections are emitted in a fixed order:
//!
//! 1. **agent_system**: behavior rules (`{{versions}}` substituted)
//! 2. **skills**: guidance for each active skill
//! 3. **writing_rules**
//! 4. **output_contract**: static formatting rules, never resolved
//! 5. **version_targeting**: only when more than one version is requested
//! 6. **product**, 7. **brand**, 8. **positioning**
//! 9. **personas**: deep dive for one persona, intersection for several
//! 10. **swipe**, 11. **research**
//!
//! Sections that end up empty are dropped, never rendered as bare
//! headings.
//!
//! # Determinism
//!
//! Composition is a pure function of its inputs: identical inputs always
//! produce byte-identical text. No random or time-dependent logic is used.

use crate::defaults::{DefaultBlocks, keys};
use crate::resolver::{BlockResolver, OverrideMap};
use crate::template::{TemplateVars, substitute};
use copyforge_core::block::PromptBlockRecord;
use copyforge_core::error::PromptError;
use copyforge_core::text::{char_len, take_chars};
use copyforge_core::thread::{
    MAX_VERSIONS, MIN_VERSIONS, Persona, Positioning, Product, ResearchItem, Swipe, ThreadContext,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Marker placed between kept sections.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";
/// Swipe transcripts are cut to this many characters.
pub const SWIPE_TRANSCRIPT_MAX_CHARS: usize = 7_000;
/// Research content excerpts are cut to this many characters.
pub const RESEARCH_EXCERPT_MAX_CHARS: usize = 1_200;

// ── Types ─────────────────────────────────────────────────────────────────

/// How the persona section addresses the targeted audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomMode {
    /// No persona targeted
    Unselected,
    /// Exactly one persona: go specific
    DeepDive,
    /// Two or more personas: find common ground
    Intersection,
}

impl ZoomMode {
    pub fn for_persona_count(count: usize) -> Self {
        match count {
            0 => ZoomMode::Unselected,
            1 => ZoomMode::DeepDive,
            _ => ZoomMode::Intersection,
        }
    }
}

/// All inputs required by the composer for a single call.
#[derive(Debug, Clone, Copy)]
pub struct ComposeInput<'a> {
    pub thread: &'a ThreadContext,
    /// Explicit subset of version numbers the user asked for, if any.
    pub requested_versions: &'a [u8],
    pub product: &'a Product,
    /// Targeted personas, already resolved from `thread.avatar_ids`.
    pub personas: &'a [Persona],
    pub positioning: Option<&'a Positioning>,
    pub swipe: Option<&'a Swipe>,
    pub research: &'a [ResearchItem],
}

impl<'a> ComposeInput<'a> {
    /// Input with only the required parts; optional context left empty.
    pub fn new(thread: &'a ThreadContext, product: &'a Product) -> Self {
        Self {
            thread,
            requested_versions: &[],
            product,
            personas: &[],
            positioning: None,
            swipe: None,
            research: &[],
        }
    }
}

/// Name and character length of one kept section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionStat {
    pub name: String,
    pub length: usize,
}

/// The composed system prompt plus how it was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedPrompt {
    pub text: String,
    /// Every block resolved during composition, once per key.
    pub block_trace: Vec<PromptBlockRecord>,
    /// Kept sections in emission order.
    pub sections: Vec<SectionStat>,
}

// ── Composer ──────────────────────────────────────────────────────────────

/// The system prompt composer. Stateless, so one instance can be reused.
pub struct PromptComposer<'a> {
    overrides: &'a OverrideMap,
    defaults: &'a DefaultBlocks,
}

impl<'a> PromptComposer<'a> {
    pub fn new(overrides: &'a OverrideMap, defaults: &'a DefaultBlocks) -> Self {
        Self {
            overrides,
            defaults,
        }
    }

    /// Compose the system prompt.
    ///
    /// Fails only when the version count is outside `1..=6`; callers are
    /// expected to clamp with [`ThreadContext::clamp_versions`] first.
    pub fn compose(&self, input: &ComposeInput<'_>) -> Result<ComposedPrompt, PromptError> {
        let versions = input.thread.versions;
        if !(MIN_VERSIONS..=MAX_VERSIONS).contains(&versions) {
            return Err(PromptError::VersionsOutOfRange {
                versions: versions as i64,
            });
        }

        let vars = TemplateVars::new()
            .with("versions", versions)
            .with("count", input.personas.len());
        let mut resolver = BlockResolver::new(self.overrides, self.defaults);

        let sections: [(&str, String); 11] = [
            (
                "agent_system",
                block_text(&mut resolver, keys::AGENT_SYSTEM, &vars),
            ),
            (
                "skills",
                skills_section(&mut resolver, input.thread, &vars),
            ),
            (
                "writing_rules",
                with_heading(
                    "Writing rules",
                    &block_text(&mut resolver, keys::WRITING_RULES, &vars),
                ),
            ),
            ("output_contract", output_contract(versions)),
            (
                "version_targeting",
                version_targeting(versions, input.requested_versions),
            ),
            ("product", product_section(input.product)),
            ("brand", brand_section(input.product)),
            (
                "positioning",
                input.positioning.map(positioning_section).unwrap_or_default(),
            ),
            (
                "personas",
                personas_section(&mut resolver, input.personas, &vars),
            ),
            ("swipe", input.swipe.map(swipe_section).unwrap_or_default()),
            ("research", research_section(input.research)),
        ];

        let mut kept: Vec<&str> = Vec::new();
        let mut stats: Vec<SectionStat> = Vec::new();
        for (name, text) in &sections {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            stats.push(SectionStat {
                name: (*name).to_string(),
                length: char_len(text),
            });
            kept.push(text);
        }

        let text = kept.join(SECTION_SEPARATOR);
        let block_trace = resolver.into_trace();

        debug!(
            sections = stats.len(),
            blocks = block_trace.len(),
            prompt_len = char_len(&text),
            zoom = ?ZoomMode::for_persona_count(input.personas.len()),
            "Composed system prompt"
        );

        Ok(ComposedPrompt {
            text,
            block_trace,
            sections: stats,
        })
    }
}

// ── Section renderers ─────────────────────────────────────────────────────

fn block_text(resolver: &mut BlockResolver<'_>, key: &str, vars: &TemplateVars) -> String {
    let record = resolver.resolve(key);
    if record.is_empty() {
        return String::new();
    }
    substitute(record.content.trim(), vars)
}

fn with_heading(title: &str, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!("# {title}\n{body}")
    }
}

fn skills_section(
    resolver: &mut BlockResolver<'_>,
    thread: &ThreadContext,
    vars: &TemplateVars,
) -> String {
    thread
        .active_skills()
        .into_iter()
        .filter_map(|skill| {
            let text = block_text(resolver, skill, vars);
            (!text.is_empty()).then(|| format!("# Skill: {skill}\n{text}"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn output_contract(versions: u8) -> String {
    let headings = (1..=versions)
        .map(|n| format!("`## Version {n}`"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "# Output contract\n\
         - Put all creative copy in exactly one fenced block opened with ```draft and closed with ```.\n\
         - Inside the draft block, start each version with its own heading line, exactly: {headings}.\n\
         - Write no prose outside the draft block when delivering creative content.\n\
         - Replies that are not creative content are one sentence or at most two bullets."
    )
}

fn version_targeting(versions: u8, requested: &[u8]) -> String {
    if versions <= 1 {
        return String::new();
    }

    let mut subset: Vec<u8> = requested
        .iter()
        .copied()
        .filter(|n| (1..=versions).contains(n))
        .collect();
    subset.sort_unstable();
    subset.dedup();
    if subset.len() != requested.len() {
        warn!(
            ?requested,
            versions, "Requested versions filtered to the thread's range"
        );
    }

    if subset.is_empty() || subset.len() == versions as usize {
        format!(
            "# Version targeting\n\
             Write all {versions} versions. Each version takes a distinct angle."
        )
    } else {
        let list = subset
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "# Version targeting\n\
             Only write these versions: {list}. Leave every other version out of the draft block."
        )
    }
}

fn product_section(product: &Product) -> String {
    let mut lines = Vec::new();
    let name = product.name.trim();
    if !name.is_empty() {
        lines.push(format!("Name: {name}"));
    }
    let context = product.content.trim();
    if !context.is_empty() {
        lines.push(context.to_string());
    }
    with_heading("Product", &lines.join("\n\n"))
}

fn brand_section(product: &Product) -> String {
    let name = product.brand_name.as_deref().map(str::trim).unwrap_or("");
    let voice = product.brand_voice.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() && voice.is_empty() {
        return String::new();
    }

    let mut lines = Vec::new();
    if !name.is_empty() {
        lines.push(format!("Name: {name}"));
    }
    if !voice.is_empty() {
        lines.push(format!("Voice guidelines:\n{voice}"));
    }
    with_heading("Brand", &lines.join("\n"))
}

fn positioning_section(positioning: &Positioning) -> String {
    let mut body = String::new();
    let name = positioning.name.trim();
    if !name.is_empty() {
        body.push_str(&format!("Angle: {name}\n"));
    }
    body.push_str(positioning.content.trim());
    with_heading("Positioning", &body)
}

fn personas_section(
    resolver: &mut BlockResolver<'_>,
    personas: &[Persona],
    vars: &TemplateVars,
) -> String {
    match ZoomMode::for_persona_count(personas.len()) {
        ZoomMode::Unselected => "# Personas\n\
             No personas are selected for this thread. Write for the product's general audience."
            .to_string(),
        ZoomMode::DeepDive => {
            let persona = &personas[0];
            let mut out = format!(
                "# Persona (deep dive): {}\n{}",
                persona.name.trim(),
                persona.content
            );
            let guidance = block_text(resolver, keys::ZOOM_DEEP, vars);
            if !guidance.is_empty() {
                out.push_str("\n\n## Zoom\n");
                out.push_str(&guidance);
            }
            out
        }
        ZoomMode::Intersection => {
            let mut out = format!("# Personas (intersection of {})", personas.len());
            for persona in personas {
                out.push_str(&format!(
                    "\n\n## {}\n{}",
                    persona.name.trim(),
                    persona.content.trim()
                ));
            }
            let guidance = block_text(resolver, keys::ZOOM_BROAD, vars);
            if !guidance.is_empty() {
                out.push_str("\n\n## Zoom\n");
                out.push_str(&guidance);
            }
            out
        }
    }
}

fn swipe_section(swipe: &Swipe) -> String {
    let mut lines = vec![format!("Status: {}", swipe.status.trim())];
    if let Some(title) = non_blank(&swipe.title) {
        lines.push(format!("Title: {title}"));
    }
    if let Some(url) = non_blank(&swipe.url) {
        lines.push(format!("URL: {url}"));
    }
    if let Some(summary) = non_blank(&swipe.summary) {
        lines.push(format!("Summary: {summary}"));
    }

    if swipe.is_ready() {
        if let Some(transcript) = non_blank(&swipe.transcript) {
            lines.push(format!(
                "Transcript:\n{}",
                take_chars(transcript, SWIPE_TRANSCRIPT_MAX_CHARS)
            ));
        }
    } else {
        lines.push("Transcript: (not ready yet)".to_string());
    }

    with_heading("Reference swipe", &lines.join("\n"))
}

fn research_section(items: &[ResearchItem]) -> String {
    let rendered: Vec<String> = items
        .iter()
        .map(|item| {
            let title = item.title.trim();
            let mut out = format!("## {}", if title.is_empty() { "Untitled" } else { title });
            if let Some(summary) = non_blank(&item.summary) {
                out.push_str(&format!("\nSummary: {summary}"));
            }
            let content = item.content.trim();
            if !content.is_empty() {
                out.push_str(&format!(
                    "\nExcerpt:\n{}",
                    take_chars(content, RESEARCH_EXCERPT_MAX_CHARS)
                ));
            }
            out
        })
        .collect();

    with_heading("Research", &rendered.join("\n\n"))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ── Tests ─────────────────────────────────────────────────────────────────
