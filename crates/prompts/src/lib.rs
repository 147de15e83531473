//! Prompt compilation for CopyForge.
//!
//! Resolves named prompt blocks with deterministic fallback, applies
//! `{{token}}` substitution, and composes the conversational system
//! prompt plus the single-block task prompts.
//!
//! # Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | 1. Resolve | [`resolver`] | `PromptBlockRecord` (override → default → missing) |
//! | 2. Substitute | [`template`] | block text with tokens replaced |
//! | 3. Compose | [`composer`] | `ComposedPrompt` with block and section trace |
//!
//! Every call builds its own resolver over request-scoped maps; nothing
//! is cached across calls.

pub mod composer;
pub mod defaults;
pub mod resolver;
pub mod tasks;
pub mod template;

pub use composer::{ComposeInput, ComposedPrompt, PromptComposer, SectionStat, ZoomMode};
pub use defaults::DefaultBlocks;
pub use resolver::{BlockResolver, OverrideMap, resolve};
pub use tasks::{TaskComposer, TaskPrompt};
pub use template::{TemplateVars, substitute};
