//! Marker-based truncation.

use copyforge_core::text::{char_len, take_chars};

/// Appended to clipped text.
pub const TRUNCATION_MARKER: &str = "\n[truncated]";

/// Result of clipping a piece of text to a character limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clipped {
    pub text: String,
    pub clipped: bool,
}

/// Clip `text` to at most `limit` characters.
///
/// Text that fits is returned unchanged. Otherwise a prefix is kept and
/// [`TRUNCATION_MARKER`] appended so that prefix plus marker is exactly
/// `limit` characters. When `limit` cannot hold more than the marker, the
/// text is hard-cut to `limit` with no marker.
pub fn clip_with_marker(text: &str, limit: usize) -> Clipped {
    if char_len(text) <= limit {
        return Clipped {
            text: text.to_string(),
            clipped: false,
        };
    }

    let marker_len = char_len(TRUNCATION_MARKER);
    let text = if limit <= marker_len {
        take_chars(text, limit).to_string()
    } else {
        format!("{}{}", take_chars(text, limit - marker_len), TRUNCATION_MARKER)
    };

    Clipped {
        text,
        clipped: true,
    }
}
