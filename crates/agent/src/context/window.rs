//! Context window packing: the bounded slice of history sent to the model.
//!
//! History is walked newest-first and packed greedily under three budgets:
//!
//! | Budget | Applies to | On overflow |
//! |--------|------------|-------------|
//! | `max_messages` | message count | older messages dropped |
//! | `max_chars` | total characters | message clipped to what remains, then stop |
//! | `max_chars_per_message` | each message | message clipped with a marker |
//!
//! The newest candidate is exempt from the per-message cap when it is a
//! `user` message, so the request being answered is never cut short by
//! that cap. It can still be clipped by the total budget.
//!
//! # Determinism
//!
//! Packing is deterministic and the trace is exact: every count in
//! [`WindowTrace`] is derived from the same pass that selects messages.

use crate::context::clip::clip_with_marker;
use copyforge_core::error::ContextError;
use copyforge_core::limits::WindowLimits;
use copyforge_core::message::{HistoryMessage, Role};
use copyforge_core::text::{char_len, single_line, take_chars};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ── Types ─────────────────────────────────────────────────────────────────

/// Trace record for one forwarded message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowEntry {
    pub role: Role,
    /// Characters before clipping.
    pub original_length: usize,
    /// Characters actually forwarded.
    pub used_length: usize,
    pub clipped: bool,
    /// Single-line preview of the forwarded text.
    pub preview: String,
}

/// Exact accounting of one packing pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowTrace {
    /// Eligible messages (user/assistant with non-blank content).
    pub candidate_messages: usize,
    /// Characters across all eligible messages, before clipping.
    pub candidate_chars: usize,
    /// Messages filtered out for role or blank content.
    pub ineligible_messages: usize,
    pub selected_messages: usize,
    pub selected_chars: usize,
    /// `candidate_messages - selected_messages`
    pub dropped_messages: usize,
    pub clipped_messages: usize,
    pub limits: WindowLimits,
    /// One entry per forwarded message, oldest first.
    pub entries: Vec<WindowEntry>,
}

/// The packed window, oldest message first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindow {
    pub messages: Vec<HistoryMessage>,
    pub trace: WindowTrace,
}

// ── Builder ───────────────────────────────────────────────────────────────

/// The window builder. Stateless, so one instance can be reused.
pub struct WindowBuilder {
    limits: WindowLimits,
}

impl WindowBuilder {
    pub fn new(limits: WindowLimits) -> Self {
        Self { limits }
    }

    /// Create a builder with the default limits.
    pub fn with_default_limits() -> Self {
        Self::new(WindowLimits::default())
    }

    pub fn limits(&self) -> &WindowLimits {
        &self.limits
    }

    /// Pack `history` (oldest first) into a window.
    ///
    /// # Algorithm
    ///
    /// 1. Reject history whose timestamps go backwards
    /// 2. Keep only user/assistant messages with non-blank content
    /// 3. Walk newest → oldest until the message or character budget is spent
    /// 4. Clip each candidate to its per-message limit, then to the remaining budget
    /// 5. Skip candidates that clip to nothing; accept the rest
    /// 6. Restore chronological order
    pub fn build(&self, history: &[HistoryMessage]) -> Result<ContextWindow, ContextError> {
        check_chronological(history)?;

        let limits = self.limits;
        let eligible: Vec<&HistoryMessage> = history
            .iter()
            .filter(|m| m.role.is_conversational() && !m.content.trim().is_empty())
            .collect();
        let candidate_chars: usize = eligible.iter().map(|m| m.char_len()).sum();

        let mut remaining = limits.max_chars;
        let mut selected: Vec<HistoryMessage> = Vec::new();
        let mut entries: Vec<WindowEntry> = Vec::new();

        for (considered, msg) in eligible.iter().rev().enumerate() {
            if selected.len() >= limits.max_messages || remaining == 0 {
                break;
            }

            let original_length = msg.char_len();
            let per_message_limit = if considered == 0 && msg.role == Role::User {
                limits.max_chars_per_message.max(original_length)
            } else {
                limits.max_chars_per_message
            };

            let per_message = clip_with_marker(&msg.content, per_message_limit);
            let budgeted = clip_with_marker(&per_message.text, remaining);
            let used_length = char_len(&budgeted.text);
            if used_length == 0 {
                continue;
            }

            remaining -= used_length;
            entries.push(WindowEntry {
                role: msg.role,
                original_length,
                used_length,
                clipped: per_message.clipped || budgeted.clipped,
                preview: preview(&budgeted.text, limits.preview_chars),
            });
            selected.push(HistoryMessage {
                role: msg.role,
                content: budgeted.text,
                created_at: msg.created_at,
            });
        }

        selected.reverse();
        entries.reverse();

        let selected_chars = limits.max_chars - remaining;
        let trace = WindowTrace {
            candidate_messages: eligible.len(),
            candidate_chars,
            ineligible_messages: history.len() - eligible.len(),
            selected_messages: selected.len(),
            selected_chars,
            dropped_messages: eligible.len() - selected.len(),
            clipped_messages: entries.iter().filter(|e| e.clipped).count(),
            limits,
            entries,
        };

        debug!(
            candidates = trace.candidate_messages,
            selected = trace.selected_messages,
            dropped = trace.dropped_messages,
            clipped = trace.clipped_messages,
            chars = trace.selected_chars,
            "Built context window"
        );

        Ok(ContextWindow {
            messages: selected,
            trace,
        })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────

fn check_chronological(history: &[HistoryMessage]) -> Result<(), ContextError> {
    let mut latest = None;
    for (index, msg) in history.iter().enumerate() {
        if let Some(at) = msg.created_at {
            if latest.is_some_and(|prev| at < prev) {
                return Err(ContextError::OutOfOrder { index });
            }
            latest = Some(at);
        }
    }
    Ok(())
}

fn preview(text: &str, max: usize) -> String {
    let line = single_line(text);
    if char_len(&line) <= max {
        return line;
    }
    if max == 0 {
        return String::new();
    }
    format!("{}…", take_chars(&line, max - 1))
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    // ── Helpers ────────────────────────────────────────────────────────

    fn limits(max_messages: usize, max_chars: usize, per_message: usize) -> WindowLimits {
        WindowLimits {
            max_messages,
            max_chars,
            max_chars_per_message: per_message,
            preview_chars: 40,
        }
    }

    fn total_chars(window: &ContextWindow) -> usize {
        window.messages.iter().map(|m| m.char_len()).sum()
    }

    fn system_note(content: &str) -> HistoryMessage {
        HistoryMessage {
            role: Role::System,
            content: content.into(),
            created_at: None,
        }
    }

    // ── Tests ──────────────────────────────────────────────────────────

    #[test]
    fn chronological_order_preserved() {
        let history = vec![
            HistoryMessage::user("m1"),
            HistoryMessage::assistant("m2"),
            HistoryMessage::user("m3"),
        ];
        let window = WindowBuilder::with_default_limits().build(&history).unwrap();
        assert_eq!(window.messages, history);
        assert_eq!(window.trace.dropped_messages, 0);
    }

    #[test]
    fn message_count_budget_keeps_newest() {
        let history: Vec<HistoryMessage> = (0..10)
            .map(|i| HistoryMessage::user(format!("message {i}")))
            .collect();
        let window = WindowBuilder::new(limits(3, 10_000, 1_000))
            .build(&history)
            .unwrap();

        let contents: Vec<&str> = window.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["message 7", "message 8", "message 9"]);
        assert_eq!(window.trace.selected_messages, 3);
        assert_eq!(window.trace.dropped_messages, 7);
    }

    #[test]
    fn newest_user_exempt_from_per_message_cap() {
        let history = vec![
            HistoryMessage::assistant("earlier reply"),
            HistoryMessage::user("u".repeat(4_000)),
        ];
        let window = WindowBuilder::new(limits(14, 5_000, 50))
            .build(&history)
            .unwrap();

        let newest = window.messages.last().unwrap();
        assert_eq!(newest.char_len(), 4_000);
        assert!(!window.trace.entries.last().unwrap().clipped);
        assert_eq!(window.messages[0].content, "earlier reply");
    }

    #[test]
    fn newest_user_still_bound_by_total_budget() {
        let history = vec![HistoryMessage::user("u".repeat(4_000))];
        let window = WindowBuilder::new(limits(14, 1_000, 50))
            .build(&history)
            .unwrap();

        let newest = &window.messages[0];
        assert_eq!(newest.char_len(), 1_000);
        assert!(newest.content.ends_with("\n[truncated]"));
        assert!(window.trace.entries[0].clipped);
    }

    #[test]
    fn newest_assistant_gets_no_exemption() {
        let history = vec![
            HistoryMessage::user("question"),
            HistoryMessage::assistant("a".repeat(500)),
        ];
        let window = WindowBuilder::new(limits(14, 5_000, 50))
            .build(&history)
            .unwrap();

        assert_eq!(window.messages[1].char_len(), 50);
        assert!(window.trace.entries[1].clipped);
    }

    #[test]
    fn older_user_messages_are_capped() {
        let history = vec![
            HistoryMessage::user("o".repeat(500)),
            HistoryMessage::user("latest"),
        ];
        let window = WindowBuilder::new(limits(14, 5_000, 50))
            .build(&history)
            .unwrap();

        assert_eq!(window.messages[0].char_len(), 50);
        assert_eq!(window.messages[1].content, "latest");
    }

    #[test]
    fn ineligible_messages_filtered_and_counted() {
        let history = vec![
            system_note("internal"),
            HistoryMessage::user("   "),
            HistoryMessage::user("real question"),
            HistoryMessage::assistant(""),
        ];
        let window = WindowBuilder::with_default_limits().build(&history).unwrap();

        assert_eq!(window.messages.len(), 1);
        assert_eq!(window.trace.candidate_messages, 1);
        assert_eq!(window.trace.ineligible_messages, 3);
        assert_eq!(window.trace.candidate_chars, "real question".len());
    }

    #[test]
    fn total_budget_stops_packing() {
        let history = vec![
            HistoryMessage::user("a".repeat(100)),
            HistoryMessage::assistant("b".repeat(100)),
            HistoryMessage::user("c".repeat(100)),
        ];
        let window = WindowBuilder::new(limits(14, 150, 1_000))
            .build(&history)
            .unwrap();

        assert_eq!(window.messages.len(), 2);
        assert_eq!(total_chars(&window), 150);
        assert_eq!(window.messages[1].content, "c".repeat(100));
        assert!(window.messages[0].content.ends_with("\n[truncated]"));
        assert_eq!(window.trace.selected_chars, 150);
        assert_eq!(window.trace.dropped_messages, 1);
    }

    #[test]
    fn trace_aggregates_are_exact() {
        let history = vec![
            HistoryMessage::user("x".repeat(300)),
            HistoryMessage::assistant("y".repeat(20)),
            HistoryMessage::user("z".repeat(30)),
        ];
        let window = WindowBuilder::new(limits(14, 10_000, 100))
            .build(&history)
            .unwrap();
        let trace = &window.trace;

        assert_eq!(trace.candidate_messages, 3);
        assert_eq!(trace.candidate_chars, 350);
        assert_eq!(trace.selected_messages, 3);
        assert_eq!(trace.selected_chars, 150);
        assert_eq!(trace.clipped_messages, 1);
        assert_eq!(trace.entries.len(), 3);
        assert_eq!(trace.entries[0].original_length, 300);
        assert_eq!(trace.entries[0].used_length, 100);
        let used: usize = trace.entries.iter().map(|e| e.used_length).sum();
        assert_eq!(used, trace.selected_chars);
        assert_eq!(trace.limits.max_chars_per_message, 100);
    }

    #[test]
    fn preview_is_single_line_and_bounded() {
        let history = vec![HistoryMessage::user(format!(
            "line one\n\nline two {}",
            "w".repeat(300)
        ))];
        let window = WindowBuilder::with_default_limits().build(&history).unwrap();
        let preview = &window.trace.entries[0].preview;

        assert!(preview.starts_with("line one line two"));
        assert!(!preview.contains('\n'));
        assert_eq!(char_len(preview), 220);
        assert!(preview.ends_with('…'));
    }

    #[test]
    fn zero_message_budget_yields_empty_window() {
        let history = vec![HistoryMessage::user("hello")];
        let window = WindowBuilder::new(limits(0, 1_000, 100))
            .build(&history)
            .unwrap();
        assert!(window.messages.is_empty());
        assert_eq!(window.trace.dropped_messages, 1);
    }

    #[test]
    fn timestamps_going_backwards_rejected() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let history = vec![
            HistoryMessage::user("first").at(t0),
            HistoryMessage::assistant("untimed"),
            HistoryMessage::user("second").at(t0 - Duration::minutes(5)),
        ];
        let err = WindowBuilder::with_default_limits()
            .build(&history)
            .unwrap_err();
        assert_eq!(err, ContextError::OutOfOrder { index: 2 });
    }

    #[test]
    fn equal_timestamps_are_chronological() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let history = vec![
            HistoryMessage::user("a").at(t0),
            HistoryMessage::assistant("b").at(t0),
        ];
        assert!(WindowBuilder::with_default_limits().build(&history).is_ok());
    }

    // ── Properties ─────────────────────────────────────────────────────

    fn arb_message() -> impl Strategy<Value = HistoryMessage> {
        (any::<bool>(), 0usize..400, prop::sample::select(vec!['a', 'é', ' ', '\n']))
            .prop_map(|(is_user, len, ch)| {
                let content: String = std::iter::repeat(ch).take(len).collect();
                if is_user {
                    HistoryMessage::user(content)
                } else {
                    HistoryMessage::assistant(content)
                }
            })
    }

    fn arb_limits() -> impl Strategy<Value = WindowLimits> {
        (0usize..20, 0usize..2_000, 0usize..300, 0usize..50).prop_map(
            |(max_messages, max_chars, max_chars_per_message, preview_chars)| WindowLimits {
                max_messages,
                max_chars,
                max_chars_per_message,
                preview_chars,
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Message count, total characters and per-message caps always hold.
        #[test]
        fn prop_budgets_conserved(
            history in prop::collection::vec(arb_message(), 0..30),
            limits in arb_limits()
        ) {
            let window = WindowBuilder::new(limits).build(&history).unwrap();

            prop_assert!(window.messages.len() <= limits.max_messages);
            prop_assert!(total_chars(&window) <= limits.max_chars);
            prop_assert_eq!(total_chars(&window), window.trace.selected_chars);

            let newest_eligible = history
                .iter()
                .rev()
                .find(|m| m.role.is_conversational() && !m.content.trim().is_empty());
            // The newest eligible message is always the last one forwarded.
            let exempt_last = newest_eligible.is_some_and(|m| m.role == Role::User);
            let last = window.messages.len().saturating_sub(1);
            for (i, msg) in window.messages.iter().enumerate() {
                if exempt_last && i == last {
                    continue;
                }
                prop_assert!(msg.char_len() <= limits.max_chars_per_message);
            }
        }

        /// Forwarded messages keep their relative history order.
        #[test]
        fn prop_output_is_chronological_subsequence(
            history in prop::collection::vec(arb_message(), 0..30),
            limits in arb_limits()
        ) {
            let tagged: Vec<HistoryMessage> = history
                .into_iter()
                .enumerate()
                .map(|(i, m)| HistoryMessage { content: format!("{i:03}|{}", m.content), ..m })
                .collect();
            let window = WindowBuilder::new(limits).build(&tagged).unwrap();

            let ids: Vec<&str> = window
                .messages
                .iter()
                .filter_map(|m| m.content.get(..4))
                .filter(|prefix| prefix.ends_with('|'))
                .collect();
            let mut sorted = ids.clone();
            sorted.sort();
            prop_assert_eq!(ids, sorted);
        }

        /// Trace counts always reconcile.
        #[test]
        fn prop_trace_reconciles(
            history in prop::collection::vec(arb_message(), 0..30),
            limits in arb_limits()
        ) {
            let window = WindowBuilder::new(limits).build(&history).unwrap();
            let trace = &window.trace;

            prop_assert_eq!(trace.candidate_messages + trace.ineligible_messages, history.len());
            prop_assert_eq!(trace.selected_messages, window.messages.len());
            prop_assert_eq!(trace.dropped_messages, trace.candidate_messages - trace.selected_messages);
            prop_assert_eq!(trace.entries.len(), window.messages.len());
            prop_assert!(trace.entries.iter().all(|e| char_len(&e.preview) <= limits.preview_chars));
        }
    }
}
