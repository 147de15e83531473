//! `{{token}}` substitution shared by every composer.
//!
//! Tokens are `{{identifier}}` where the identifier matches
//! `[a-z0-9_]+`, case-insensitively. Each occurrence is replaced with the
//! matching variable, or with nothing when the variable is absent.
//! Substituted values are never re-scanned.

use regex_lite::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{\{([a-z0-9_]+)\}\}").expect("token pattern is valid"));

/// Variables available to a substitution pass. Keys are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    values: BTreeMap<String, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl ToString) {
        self.values.insert(key.to_ascii_lowercase(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Replace every `{{token}}` in `text` from `vars`.
pub fn substitute(text: &str, vars: &TemplateVars) -> String {
    if !text.contains("{{") {
        return text.to_string();
    }

    TOKEN
        .replace_all(text, |caps: &Captures<'_>| {
            vars.get(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}
