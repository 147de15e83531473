//! Budgets for the context window.

use crate::error::ContextError;
use serde::{Deserialize, Serialize};

/// Character and message budgets applied when packing history.
///
/// All character counts are Unicode scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowLimits {
    /// Maximum number of messages forwarded
    pub max_messages: usize,
    /// Maximum total characters across forwarded messages
    pub max_chars: usize,
    /// Maximum characters for a single message (newest user turn exempt)
    pub max_chars_per_message: usize,
    /// Length of the single-line preview recorded in the trace
    pub preview_chars: usize,
}

pub const DEFAULT_MAX_MESSAGES: usize = 14;
pub const DEFAULT_MAX_CHARS: usize = 24_000;
pub const DEFAULT_MAX_CHARS_PER_MESSAGE: usize = 6_000;
pub const DEFAULT_PREVIEW_CHARS: usize = 220;

impl Default for WindowLimits {
    fn default() -> Self {
        Self {
            max_messages: DEFAULT_MAX_MESSAGES,
            max_chars: DEFAULT_MAX_CHARS,
            max_chars_per_message: DEFAULT_MAX_CHARS_PER_MESSAGE,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl WindowLimits {
    /// Build limits from signed, collaborator-supplied values.
    ///
    /// Negative values are rejected rather than clamped.
    pub fn try_from_signed(
        max_messages: i64,
        max_chars: i64,
        max_chars_per_message: i64,
        preview_chars: i64,
    ) -> Result<Self, ContextError> {
        Ok(Self {
            max_messages: non_negative("max_messages", max_messages)?,
            max_chars: non_negative("max_chars", max_chars)?,
            max_chars_per_message: non_negative("max_chars_per_message", max_chars_per_message)?,
            preview_chars: non_negative("preview_chars", preview_chars)?,
        })
    }
}

fn non_negative(name: &'static str, value: i64) -> Result<usize, ContextError> {
    usize::try_from(value).map_err(|_| ContextError::NegativeLimit { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let limits = WindowLimits::default();
        assert_eq!(limits.max_messages, 14);
        assert_eq!(limits.max_chars, 24_000);
        assert_eq!(limits.max_chars_per_message, 6_000);
        assert_eq!(limits.preview_chars, 220);
    }

    #[test]
    fn signed_limits_accept_zero() {
        let limits = WindowLimits::try_from_signed(0, 0, 0, 0).unwrap();
        assert_eq!(limits.max_messages, 0);
    }

    #[test]
    fn negative_limit_is_rejected_by_name() {
        let err = WindowLimits::try_from_signed(14, -1, 6000, 220).unwrap_err();
        assert_eq!(
            err,
            ContextError::NegativeLimit {
                name: "max_chars",
                value: -1
            }
        );
    }
}
