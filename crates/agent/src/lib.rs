//! Turn preparation for CopyForge.
//!
//! Takes a thread's already-fetched context and history and produces the
//! two things the language model needs:
//!
//! 1. **System prompt** composed from prompt blocks (see `copyforge-prompts`)
//! 2. **Context window** of prior turns packed under character and count budgets
//!
//! [`CopyAgent`] sends the result to a [`Provider`](copyforge_core::Provider);
//! [`PreparedTurn::preview`] renders it for inspection instead.

pub mod context;
pub mod preview;
pub mod turn;

pub use context::{ContextWindow, WindowBuilder, WindowEntry, WindowTrace};
pub use preview::{PreviewDebug, PromptPreview, RuntimeLimits};
pub use turn::{CopyAgent, PreparedTurn, TurnInput, prepare_turn};
