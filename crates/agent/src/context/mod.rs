//! History handling between the stored thread and the provider call.
//!
//! | Stage | Module | Effect |
//! |-------|--------|--------|
//! | 1. Summarize | [`draft`] | Large assistant drafts collapse to a placeholder |
//! | 2. Pack | [`window`] | Newest-first greedy packing under three budgets |
//!
//! Both stages use [`clip`] arithmetic and count characters, not bytes.

pub mod clip;
pub mod draft;
pub mod window;

pub use clip::{Clipped, TRUNCATION_MARKER, clip_with_marker};
pub use draft::{summarize_history, summarize_if_large};
pub use window::{ContextWindow, WindowBuilder, WindowEntry, WindowTrace};
