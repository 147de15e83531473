//! Configuration loading, validation, and management for CopyForge.
//!
//! Loads configuration from `~/.copyforge/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use copyforge_core::limits::{
    DEFAULT_MAX_CHARS, DEFAULT_MAX_CHARS_PER_MESSAGE, DEFAULT_MAX_MESSAGES, DEFAULT_PREVIEW_CHARS,
    WindowLimits,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.copyforge/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Context window budgets
    #[serde(default)]
    pub window: WindowConfig,

    /// Prompt preview behavior
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Where persisted prompt-block overrides come from
    #[serde(default)]
    pub blocks: BlocksConfig,
}

/// Context window configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Most messages forwarded per turn
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    /// Total character budget across forwarded messages
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Character cap for any one message (newest user message exempt)
    #[serde(default = "default_max_chars_per_message")]
    pub max_chars_per_message: usize,

    /// Length of the single-line preview in window traces
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_max_messages() -> usize {
    DEFAULT_MAX_MESSAGES
}
fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}
fn default_max_chars_per_message() -> usize {
    DEFAULT_MAX_CHARS_PER_MESSAGE
}
fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            max_chars: default_max_chars(),
            max_chars_per_message: default_max_chars_per_message(),
            preview_chars: default_preview_chars(),
        }
    }
}

/// Preview configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Include the debug payload in previews by default
    #[serde(default)]
    pub debug: bool,
}

/// Prompt block configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocksConfig {
    /// JSON array of prompt block rows to use as overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.copyforge/config.toml).
    ///
    /// Environment variables override file values:
    /// - `COPYFORGE_MAX_MESSAGES`
    /// - `COPYFORGE_MAX_CHARS`
    /// - `COPYFORGE_MAX_CHARS_PER_MESSAGE`
    /// - `COPYFORGE_PREVIEW_CHARS`
    /// - `COPYFORGE_DEBUG_PREVIEW`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let window = &mut self.window;
        for (name, slot) in [
            ("COPYFORGE_MAX_MESSAGES", &mut window.max_messages),
            ("COPYFORGE_MAX_CHARS", &mut window.max_chars),
            (
                "COPYFORGE_MAX_CHARS_PER_MESSAGE",
                &mut window.max_chars_per_message,
            ),
            ("COPYFORGE_PREVIEW_CHARS", &mut window.preview_chars),
        ] {
            if let Some(raw) = lookup(name) {
                *slot = raw.trim().parse().map_err(|_| ConfigError::EnvError {
                    name,
                    value: raw.clone(),
                })?;
            }
        }

        if let Some(raw) = lookup("COPYFORGE_DEBUG_PREVIEW") {
            self.preview.debug = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ConfigError::EnvError {
                        name: "COPYFORGE_DEBUG_PREVIEW",
                        value: raw,
                    });
                }
            };
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".copyforge")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("window.max_messages", self.window.max_messages),
            ("window.max_chars", self.window.max_chars),
            (
                "window.max_chars_per_message",
                self.window.max_chars_per_message,
            ),
            ("window.preview_chars", self.window.preview_chars),
        ] {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be at least 1"
                )));
            }
        }

        Ok(())
    }

    /// The window limits handed to the context window builder.
    pub fn window_limits(&self) -> WindowLimits {
        WindowLimits {
            max_messages: self.window.max_messages,
            max_chars: self.window.max_chars,
            max_chars_per_message: self.window.max_chars_per_message,
            preview_chars: self.window.preview_chars,
        }
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid value for {name}: {value:?}")]
    EnvError { name: &'static str, value: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_limits(), WindowLimits::default());
        assert!(!config.preview.debug);
        assert!(config.blocks.overrides_file.is_none());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn zero_limit_rejected() {
        let config = AppConfig {
            window: WindowConfig {
                max_chars: 0,
                ..WindowConfig::default()
            },
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("window.max_chars"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[window]\nmax_messages = 4\n\n[blocks]\noverrides_file = \"rows.json\""
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.window.max_messages, 4);
        assert_eq!(config.window.max_chars, DEFAULT_MAX_CHARS);
        assert_eq!(
            config.blocks.overrides_file.as_deref(),
            Some(Path::new("rows.json"))
        );
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[window\nmax_messages = ").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn zero_in_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[window]\npreview_chars = 0\n").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn env_overrides_window_and_preview() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("COPYFORGE_MAX_MESSAGES", "6"),
                ("COPYFORGE_MAX_CHARS_PER_MESSAGE", " 900 "),
                ("COPYFORGE_DEBUG_PREVIEW", "TRUE"),
            ]))
            .unwrap();

        assert_eq!(config.window.max_messages, 6);
        assert_eq!(config.window.max_chars_per_message, 900);
        assert_eq!(config.window.max_chars, DEFAULT_MAX_CHARS);
        assert!(config.preview.debug);
    }

    #[test]
    fn non_numeric_env_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env(&[("COPYFORGE_MAX_CHARS", "-5")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EnvError {
                name: "COPYFORGE_MAX_CHARS",
                ..
            }
        ));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("[window]"));
        assert!(toml_str.contains("max_chars = 24000"));
        assert!(toml_str.contains("[preview]"));
    }
}
