//! Turn preparation and the provider-driven turn runner.
//!
//! A turn is compose → summarize drafts → pack window. The result is a
//! [`PreparedTurn`] that can become a provider request or a preview.

use crate::context::draft::summarize_history;
use crate::context::{ContextWindow, WindowBuilder};
use crate::preview::{PreviewDebug, PromptPreview, RuntimeLimits};
use copyforge_core::error::{ProviderError, Result};
use copyforge_core::limits::WindowLimits;
use copyforge_core::message::HistoryMessage;
use copyforge_core::provider::{Provider, ProviderRequest};
use copyforge_core::text::char_len;
use copyforge_core::thread::{Persona, Positioning, Product, ResearchItem, Swipe, ThreadContext};
use copyforge_prompts::{ComposeInput, ComposedPrompt, DefaultBlocks, OverrideMap, PromptComposer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything a collaborator has fetched for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnInput {
    pub thread: ThreadContext,

    /// Version numbers to write this turn; empty means all.
    #[serde(default)]
    pub requested_versions: Vec<u8>,

    #[serde(default)]
    pub product: Product,

    #[serde(default)]
    pub personas: Vec<Persona>,

    #[serde(default)]
    pub positioning: Option<Positioning>,

    #[serde(default)]
    pub swipe: Option<Swipe>,

    #[serde(default)]
    pub research: Vec<ResearchItem>,

    /// Stored conversation, oldest first
    #[serde(default)]
    pub history: Vec<HistoryMessage>,
}

impl TurnInput {
    pub fn new(thread: ThreadContext) -> Self {
        Self {
            thread,
            requested_versions: Vec::new(),
            product: Product::default(),
            personas: Vec::new(),
            positioning: None,
            swipe: None,
            research: Vec::new(),
            history: Vec::new(),
        }
    }

    fn compose_input(&self) -> ComposeInput<'_> {
        ComposeInput {
            thread: &self.thread,
            requested_versions: &self.requested_versions,
            product: &self.product,
            personas: &self.personas,
            positioning: self.positioning.as_ref(),
            swipe: self.swipe.as_ref(),
            research: &self.research,
        }
    }
}

/// A composed prompt and its packed window.
#[derive(Debug, Clone)]
pub struct PreparedTurn {
    pub thread: ThreadContext,
    pub prompt: ComposedPrompt,
    pub window: ContextWindow,
    pub limits: WindowLimits,
}

impl PreparedTurn {
    /// The `{system, messages}` pair for the provider.
    pub fn request(&self) -> ProviderRequest {
        ProviderRequest {
            system: self.prompt.text.clone(),
            messages: self.window.messages.clone(),
        }
    }

    /// The preview payload; `debug` is populated only when asked for.
    pub fn preview(&self, debug: bool) -> PromptPreview {
        let debug = debug.then(|| PreviewDebug {
            thread_context: self.thread.clone(),
            prompt_blocks: self.prompt.block_trace.clone(),
            prompt_sections: self.prompt.sections.clone(),
            context_window: self.window.trace.clone(),
            context_messages: self.window.messages.clone(),
            runtime_limits: RuntimeLimits::new(self.limits),
        });
        PromptPreview {
            prompt: self.prompt.text.clone(),
            debug,
        }
    }
}

/// Compose the system prompt and pack the history for one turn.
///
/// The thread's version count must already be in `1..=6`.
pub fn prepare_turn(
    input: &TurnInput,
    overrides: &OverrideMap,
    defaults: &DefaultBlocks,
    limits: &WindowLimits,
) -> Result<PreparedTurn> {
    let prompt = PromptComposer::new(overrides, defaults).compose(&input.compose_input())?;
    let history = summarize_history(input.history.clone());
    let window = WindowBuilder::new(*limits).build(&history)?;

    debug!(
        prompt_len = char_len(&prompt.text),
        sections = prompt.sections.len(),
        messages = window.messages.len(),
        "Prepared turn"
    );

    Ok(PreparedTurn {
        thread: input.thread.clone(),
        prompt,
        window,
        limits: *limits,
    })
}

/// Runs turns against a provider.
pub struct CopyAgent<P: Provider> {
    provider: P,
    overrides: OverrideMap,
    defaults: DefaultBlocks,
    limits: WindowLimits,
}

impl<P: Provider> CopyAgent<P> {
    /// Create an agent with built-in defaults, no overrides and default limits.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            overrides: OverrideMap::new(),
            defaults: DefaultBlocks::builtin(),
            limits: WindowLimits::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: OverrideMap) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_defaults(mut self, defaults: DefaultBlocks) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_limits(mut self, limits: WindowLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn prepare(&self, input: &TurnInput) -> Result<PreparedTurn> {
        prepare_turn(input, &self.overrides, &self.defaults, &self.limits)
    }

    /// Prepare a turn, send it, and return the reply text.
    pub async fn respond(&self, input: &TurnInput) -> Result<String> {
        let turn = self.prepare(input)?;
        info!(
            provider = self.provider.name(),
            messages = turn.window.messages.len(),
            dropped = turn.window.trace.dropped_messages,
            "Sending turn to provider"
        );

        let response = self.provider.complete(turn.request()).await?;
        if response.text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse.into());
        }

        debug!(model = %response.model, reply_len = char_len(&response.text), "Provider replied");
        Ok(response.text)
    }
}
