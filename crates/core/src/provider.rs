//! Provider trait: the abstraction over the LLM backend.
//!
//! A Provider accepts a system string plus the packed message list and
//! returns the generated text. The network call itself lives outside
//! this workspace; tests and embedders supply their own implementation.

use crate::error::ProviderError;
use crate::message::HistoryMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Everything the LLM collaborator needs for one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The composed system prompt
    pub system: String,

    /// The context window, oldest first
    pub messages: Vec<HistoryMessage>,
}

/// A completed reply from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated text
    pub text: String,

    /// Which model actually responded
    #[serde(default)]
    pub model: String,
}

/// The LLM backend trait.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name (e.g. "anthropic")
    fn name(&self) -> &str;

    /// Send a request and wait for the complete reply.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;
}
