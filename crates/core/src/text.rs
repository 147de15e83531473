//! Character-based text helpers shared by the prompt and window crates.
//!
//! Every length in CopyForge is counted in `char`s so that a multi-byte
//! character is never split and budgets mean the same thing everywhere.

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The first `max` characters of `text`.
pub fn take_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Collapse all whitespace runs to single spaces and trim the ends.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
