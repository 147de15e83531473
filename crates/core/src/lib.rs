//! # CopyForge Core
//!
//! Domain types, traits, and error definitions for the CopyForge prompt
//! engine. This crate has **zero framework dependencies**; it defines the
//! domain model that the prompt and agent crates implement against.
//!
//! Everything here is plain data: threads, entities, history rows and
//! prompt-block rows arrive from external collaborators already fetched,
//! and nothing in this crate performs I/O.

pub mod block;
pub mod error;
pub mod limits;
pub mod message;
pub mod provider;
pub mod text;
pub mod thread;

// Re-export key types at crate root for ergonomics
pub use block::{BlockSource, PromptBlockRecord, PromptBlockRow};
pub use error::{ContextError, Error, PromptError, ProviderError, Result};
pub use limits::WindowLimits;
pub use message::{HistoryMessage, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use thread::{Persona, Positioning, Product, ResearchItem, Swipe, ThreadContext};
