//! Built-in prompt blocks.
//!
//! These are the compiled-in fallbacks used whenever no persisted
//! override exists for a key.

use std::collections::BTreeMap;

/// Well-known block keys.
pub mod keys {
    pub const AGENT_SYSTEM: &str = "agent_system";
    pub const WRITING_RULES: &str = "writing_rules";
    pub const ZOOM_DEEP: &str = "zoom_deep";
    pub const ZOOM_BROAD: &str = "zoom_broad";
    pub const RESEARCH_ORGANIZER: &str = "research_organizer";
    pub const SWIPE_SUMMARY: &str = "swipe_summary";
    pub const RESEARCH_SYNTHESIS: &str = "research_synthesis";
}

const AGENT_SYSTEM: &str = "\
You are a senior direct-response copywriter working inside a brand's workspace. \
You write persuasive, specific copy for the product and personas described below.

- Every creative reply contains exactly {{versions}} version(s) of the copy.
- Keep each version meaningfully different: a new angle, hook or structure, not a reworded twin.
- Ask at most one clarifying question, and only when the request cannot be answered otherwise.
- Never invent claims, prices, guarantees or testimonials that are not in the provided context.";

const WRITING_RULES: &str = "\
- Lead with the reader's problem or desire, not the product.
- Prefer concrete nouns and numbers over adjectives.
- Short sentences. One idea per line where the format allows it.
- Match the brand voice when one is given; otherwise write plainly and confidently.
- No hashtags, emojis or exclamation marks unless the user asks for them.";

const ZOOM_DEEP: &str = "\
You are writing for exactly one persona. Go deep: use their words, their situation, \
their objections and the moments where the problem hurts most. Do not generalize to a \
broader audience.";

const ZOOM_BROAD: &str = "\
You are writing for {{count}} personas at once. Find the common ground: the shared pain, \
the shared outcome, the language all of them would recognize. Avoid details that would \
exclude any one of the {{count}} personas.";

const SKILL_AD_COPY: &str = "\
Write paid social ad copy: a scroll-stopping first line, a body that builds desire with \
one core promise, and a single clear call to action.";

const SKILL_HOOKS: &str = "\
Write hooks only: opening lines of at most 15 words designed to stop the scroll. \
Vary the mechanism across hooks (question, bold claim, specific number, pattern interrupt).";

const SKILL_UGC_SCRIPT: &str = "\
Write a user-generated-content video script: a spoken hook in the first three seconds, \
a personal problem-to-solution story, on-screen text cues in brackets, and a natural call to action.";

const SKILL_EMAIL: &str = "\
Write a marketing email: a subject line, a preview line, and a body that earns the click \
with one story or one argument. Keep paragraphs to two sentences.";

const SKILL_LANDING_PAGE: &str = "\
Write landing page copy: headline, subheadline, three benefit blocks, a proof section \
drawn only from supplied context, and a closing call to action.";

const RESEARCH_ORGANIZER: &str = "\
Group the research items below into themes a copywriter can use. For each theme give a \
short name, the item numbers that support it, and one sentence on how it could be used in copy.

{{items}}";

const SWIPE_SUMMARY: &str = "\
Summarize the reference ad titled \"{{title}}\" for a copywriter. Name the hook, the \
core promise, the structure and the call to action in at most six bullets. Then suggest a \
short descriptive title.

Transcript extract:
{{extract}}";

const RESEARCH_SYNTHESIS: &str = "\
Synthesize the research below into copy-ready insights for {{product}}: the strongest \
pains, desires, objections and exact customer phrases worth reusing. Cite item numbers.

{{items}}";

/// The compiled-in default blocks, keyed identically to overrides.
#[derive(Debug, Clone)]
pub struct DefaultBlocks {
    blocks: BTreeMap<String, String>,
}

impl DefaultBlocks {
    /// The defaults shipped with CopyForge.
    pub fn builtin() -> Self {
        let mut defaults = Self::empty();
        defaults.insert(keys::AGENT_SYSTEM, AGENT_SYSTEM);
        defaults.insert(keys::WRITING_RULES, WRITING_RULES);
        defaults.insert(keys::ZOOM_DEEP, ZOOM_DEEP);
        defaults.insert(keys::ZOOM_BROAD, ZOOM_BROAD);
        defaults.insert("ad_copy", SKILL_AD_COPY);
        defaults.insert("hooks", SKILL_HOOKS);
        defaults.insert("ugc_script", SKILL_UGC_SCRIPT);
        defaults.insert("email", SKILL_EMAIL);
        defaults.insert("landing_page", SKILL_LANDING_PAGE);
        defaults.insert(keys::RESEARCH_ORGANIZER, RESEARCH_ORGANIZER);
        defaults.insert(keys::SWIPE_SUMMARY, SWIPE_SUMMARY);
        defaults.insert(keys::RESEARCH_SYNTHESIS, RESEARCH_SYNTHESIS);
        defaults
    }

    /// A defaults table with nothing in it.
    pub fn empty() -> Self {
        Self {
            blocks: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, content: impl Into<String>) {
        self.blocks.insert(key.into(), content.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.blocks.get(key).map(String::as_str)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for DefaultBlocks {
    fn default() -> Self {
        Self::builtin()
    }
}
