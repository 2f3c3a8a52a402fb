//! Configuration types

use serde::{Deserialize, Serialize};

use super::defaults::{
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TARGET_LOCALES, DEFAULT_TEMPERATURE,
};

/// Contents of `rosetta.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Flat `default_locale = "..."` form, accepted for older project files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_locale: Option<String>,

    /// App configuration
    pub app: AppConfig,

    /// Translation model configuration
    pub ai: AiConfig,
}

impl ProjectConfig {
    /// Create the configuration written by `rosetta init`
    pub fn new(bundle_id: impl Into<String>, default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: None,
            app: AppConfig {
                bundle_id: Some(bundle_id.into()),
                default_locale: Some(default_locale.into()),
                target_locales: DEFAULT_TARGET_LOCALES
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            ai: AiConfig::default(),
        }
    }

    /// The configured default locale; `[app]` wins over the flat key
    pub fn default_locale(&self) -> Option<&str> {
        self.app
            .default_locale
            .as_deref()
            .or(self.default_locale.as_deref())
    }
}

/// App configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bundle identifier of the app
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,

    /// Source locale for translations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_locale: Option<String>,

    /// Locales to translate into
    pub target_locales: Vec<String>,
}

/// Translation model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Provider name (only "openai" is supported)
    pub provider: String,

    /// Chat model
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Completion token cap
    pub max_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}
