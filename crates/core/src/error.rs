//! Error types for the CopyForge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! Only contract violations are errors. "Nothing to show" conditions
//! (a block with no override and no default, an empty history) are
//! modeled as omission by the components themselves.

use thiserror::Error;

/// The top-level error type for all CopyForge operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Prompt composition errors ---
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    // --- Context window errors ---
    #[error("Context window error: {0}")]
    Context(#[from] ContextError),

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    /// The composer only accepts pre-validated counts; callers clamp first.
    #[error("version count {versions} is outside the supported range 1..=6")]
    VersionsOutOfRange { versions: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("limit `{name}` must not be negative (got {value})")]
    NegativeLimit { name: &'static str, value: i64 },

    #[error("history is not chronological: message {index} is older than its predecessor")]
    OutOfOrder { index: usize },
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Provider returned an empty response")]
    EmptyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_error_displays_range() {
        let err = Error::Prompt(PromptError::VersionsOutOfRange { versions: 9 });
        assert!(err.to_string().contains('9'));
        assert!(err.to_string().contains("1..=6"));
    }

    #[test]
    fn context_error_names_limit() {
        let err = Error::Context(ContextError::NegativeLimit {
            name: "max_chars",
            value: -5,
        });
        assert!(err.to_string().contains("max_chars"));
        assert!(err.to_string().contains("-5"));
    }

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn bounded_errors_convert_with_question_mark() {
        fn fails() -> Result<()> {
            Err(ProviderError::EmptyResponse)?
        }
        assert!(matches!(
            fails(),
            Err(Error::Provider(ProviderError::EmptyResponse))
        ));
    }
}
