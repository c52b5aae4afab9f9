//! Runtime configuration for tgdigest.
//!
//! The binary reads `tgdigest.toml` into [`AppConfig`], then overlays the
//! environment with [`apply_env_overrides`]. Every field has a default, so an
//! empty or missing file yields a working local setup.

use serde::{Deserialize, Serialize};

/// Canonical config file name.
pub const CONFIG_FILE_NAME: &str = "tgdigest.toml";

pub const ENV_OLLAMA_HOST: &str = "OLLAMA_HOST";
pub const ENV_MODEL: &str = "TGDIGEST_MODEL";
pub const ENV_BRIDGE_URL: &str = "TG_BRIDGE_URL";
pub const ENV_BRIDGE_TOKEN: &str = "TG_BRIDGE_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration (persisted as `tgdigest.toml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub ollama: OllamaSettings,
    #[serde(default)]
    pub bridge: BridgeSettings,
    #[serde(default)]
    pub summary: SummarySettings,
    #[serde(default)]
    pub ui: UiSettings,
}

/// Text-generation server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaSettings {
    #[serde(default = "default_ollama_host")]
    pub host: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_ollama_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_ollama_timeout_secs(),
        }
    }
}

/// HTTP bridge in front of the chat protocol client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeSettings {
    #[serde(default = "default_bridge_url")]
    pub url: String,
    /// Bearer token sent with every bridge request. Empty means none.
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_bridge_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            url: default_bridge_url(),
            token: String::new(),
            timeout_secs: default_bridge_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySettings {
    /// How many of the most recent messages feed one summary.
    #[serde(default = "default_history_limit")]
    pub history_limit: i64,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Input poll interval, also the spinner frame period.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_visible_chats")]
    pub visible_chats: usize,
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            visible_chats: default_visible_chats(),
            wrap_width: default_wrap_width(),
        }
    }
}

impl AppConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ollama.host.trim().is_empty() {
            return Err(invalid("ollama.host", "must not be empty"));
        }
        if self.ollama.model.trim().is_empty() {
            return Err(invalid("ollama.model", "must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.ollama.temperature) {
            return Err(invalid(
                "ollama.temperature",
                format!("{} is outside 0.0..=2.0", self.ollama.temperature),
            ));
        }
        if self.bridge.url.trim().is_empty() {
            return Err(invalid("bridge.url", "must not be empty"));
        }
        if self.ui.tick_ms == 0 {
            return Err(invalid("ui.tick_ms", "must be positive"));
        }
        if self.ui.visible_chats < 3 {
            return Err(invalid("ui.visible_chats", "must be at least 3"));
        }
        if self.ui.wrap_width < 20 {
            return Err(invalid("ui.wrap_width", "must be at least 20"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Overlay environment values on top of file settings.
///
/// `lookup` is usually `|key| std::env::var(key).ok()`. Blank values are
/// ignored. Returns true when any field changed.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let mut changed = false;
    let mut overlay = |key: &str, slot: &mut String| {
        if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
            *slot = value.trim().to_string();
            changed = true;
        }
    };

    overlay(ENV_OLLAMA_HOST, &mut config.ollama.host);
    overlay(ENV_MODEL, &mut config.ollama.model);
    overlay(ENV_BRIDGE_URL, &mut config.bridge.url);
    overlay(ENV_BRIDGE_TOKEN, &mut config.bridge.token);

    changed
}

// ── Serde default functions ─────────────────────────────────────────────

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "deepseek-r1:14b".to_string()
}
fn default_temperature() -> f64 {
    0.2
}
fn default_ollama_timeout_secs() -> u64 {
    30
}
fn default_bridge_url() -> String {
    "http://127.0.0.1:8081".to_string()
}
fn default_bridge_timeout_secs() -> u64 {
    15
}
fn default_history_limit() -> i64 {
    100
}
fn default_tick_ms() -> u64 {
    100
}
fn default_visible_chats() -> usize {
    10
}
fn default_wrap_width() -> usize {
    80
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = AppConfig::from_toml_str("").expect("parse empty config");
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.ollama.host, "http://localhost:11434");
        assert_eq!(cfg.ollama.model, "deepseek-r1:14b");
        assert_eq!(cfg.ollama.temperature, 0.2);
        assert_eq!(cfg.ollama.timeout_secs, 30);
        assert_eq!(cfg.summary.history_limit, 100);
        assert_eq!(cfg.ui.visible_chats, 10);
        assert_eq!(cfg.ui.wrap_width, 80);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
[ollama]
model = "llama3.1:8b"

[bridge]
token = "s3cret"

[summary]
history_limit = 250
"#,
        )
        .expect("parse partial config");

        assert_eq!(cfg.ollama.model, "llama3.1:8b");
        assert_eq!(cfg.ollama.host, "http://localhost:11434");
        assert_eq!(cfg.bridge.token, "s3cret");
        assert_eq!(cfg.bridge.url, "http://127.0.0.1:8081");
        assert_eq!(cfg.summary.history_limit, 250);
        assert_eq!(cfg.ui, UiSettings::default());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = AppConfig::from_toml_str("[ollama\nhost = 1").expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = AppConfig::from_toml_str("[ollama]\ntemperature = 3.5").expect_err("must fail");
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "ollama.temperature",
                ..
            }
        ));

        let err = AppConfig::from_toml_str("[ui]\ntick_ms = 0").expect_err("must fail");
        assert_eq!(err.to_string(), "invalid value for `ui.tick_ms`: must be positive");
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_OLLAMA_HOST, "http://gpu-box:11434"),
            (ENV_BRIDGE_TOKEN, "  tok  "),
            (ENV_MODEL, "   "),
        ]);
        let mut cfg = AppConfig::default();

        let changed = apply_env_overrides(&mut cfg, |key| env.get(key).map(|v| v.to_string()));

        assert!(changed);
        assert_eq!(cfg.ollama.host, "http://gpu-box:11434");
        assert_eq!(cfg.bridge.token, "tok");
        assert_eq!(cfg.ollama.model, "deepseek-r1:14b");
    }

    #[test]
    fn env_overrides_are_noop_without_variables() {
        let mut cfg = AppConfig::default();
        assert!(!apply_env_overrides(&mut cfg, |_| None));
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn serialized_defaults_parse_back() {
        let encoded = toml::to_string_pretty(&AppConfig::default()).expect("serialize config");
        assert!(encoded.contains("[ollama]"));
        assert!(encoded.contains("history_limit = 100"));
        let decoded = AppConfig::from_toml_str(&encoded).expect("parse serialized config");
        assert_eq!(decoded, AppConfig::default());
    }
}
