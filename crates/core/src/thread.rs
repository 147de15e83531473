//! Thread context and the entities a thread points at.
//!
//! These are read-only inputs to composition. The conversation thread,
//! products, personas and research items are owned by their own
//! collaborators; this module only describes the shape they arrive in.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Smallest and largest number of copy versions a reply may carry.
pub const MIN_VERSIONS: u8 = 1;
pub const MAX_VERSIONS: u8 = 6;

/// Per-thread settings that steer composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadContext {
    /// The primary skill (e.g. `ad_copy`)
    pub skill: String,

    /// Additional active skills; when non-empty these supersede `skill`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,

    /// How many versions each reply should contain (1..=6)
    pub versions: u8,

    /// Targeted persona ids
    #[serde(default)]
    pub avatar_ids: Vec<String>,

    #[serde(default)]
    pub positioning_id: Option<String>,

    #[serde(default)]
    pub active_swipe_id: Option<String>,

    #[serde(default)]
    pub research_ids: Vec<String>,
}

impl ThreadContext {
    pub fn new(skill: impl Into<String>, versions: u8) -> Self {
        Self {
            skill: skill.into(),
            skills: Vec::new(),
            versions,
            avatar_ids: Vec::new(),
            positioning_id: None,
            active_swipe_id: None,
            research_ids: Vec::new(),
        }
    }

    /// Clamp a raw version count from a request into `1..=6`.
    ///
    /// This belongs to the request layer; the composer itself rejects
    /// out-of-range counts.
    pub fn clamp_versions(raw: i64) -> u8 {
        let clamped = raw.clamp(MIN_VERSIONS as i64, MAX_VERSIONS as i64) as u8;
        if clamped as i64 != raw {
            warn!(raw, clamped, "Version count clamped");
        }
        clamped
    }

    /// The skill keys to resolve, in order, without duplicates.
    pub fn active_skills(&self) -> Vec<&str> {
        let source: Vec<&str> = if self.skills.is_empty() {
            vec![self.skill.as_str()]
        } else {
            self.skills.iter().map(String::as_str).collect()
        };

        let mut seen = Vec::with_capacity(source.len());
        for skill in source.into_iter().map(str::trim) {
            if !skill.is_empty() && !seen.contains(&skill) {
                seen.push(skill);
            }
        }
        seen
    }
}

/// The product a thread writes for, with its optional brand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    /// Free-text product context
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub brand_voice: Option<String>,
}

/// A customer profile (avatar) the agent writes toward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Positioning {
    pub name: String,
    pub content: String,
}

/// A reference ad or transcript attached to a thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swipe {
    /// Ingestion status; the transcript is only used when `ready`
    pub status: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Swipe {
    pub fn is_ready(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("ready")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchItem {
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: String,
}
