//! Default configuration values

use super::types::ProjectConfig;

/// Project configuration file name
pub const CONFIG_FILE_NAME: &str = "rosetta.toml";

/// Environment file name, searched in the working directory then its parent
pub const ENV_FILE_NAME: &str = ".env";

/// Locale used when neither the project nor the store names one
pub const DEFAULT_LOCALE: &str = "en-US";

/// Chat model used for translations
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature for translation requests
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Completion token cap for a single translation
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Target locales written by `rosetta init`
pub const DEFAULT_TARGET_LOCALES: &[&str] = &["zh-Hans", "fr-FR", "de-DE"];

/// Environment variable names
pub mod vars {
    /// App Store Connect issuer id
    pub const ISSUER_ID: &str = "ISSUER_ID";
    /// App Store Connect key id
    pub const KEY_ID: &str = "KEY_ID";
    /// Path to the `.p8` private key
    pub const PRIVATE_KEY_PATH: &str = "PRIVATE_KEY_PATH";
    /// OpenAI API key
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// OpenAI-compatible base URL override
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    /// App Store Connect base URL override
    pub const ASC_BASE_URL: &str = "ASC_BASE_URL";
    /// Verbose per-field logging
    pub const DEBUG: &str = "ROSETTA_DEBUG_JS";
    /// Caller's working directory, preferred as cache root
    pub const PWD: &str = "PWD";
}

/// Render the default `rosetta.toml` for a new project
pub fn default_config_toml(bundle_id: &str, default_locale: &str) -> String {
    let config = ProjectConfig::new(bundle_id, default_locale);
    toml::to_string_pretty(&config).unwrap_or_else(|_| DEFAULT_CONFIG_TEMPLATE.to_string())
}

/// Fallback configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Rosetta Configuration

[app]
default_locale = "en-US"
target_locales = ["zh-Hans", "fr-FR", "de-DE"]

[ai]
provider = "openai"
model = "gpt-4o-mini"
temperature = 0.3
max_tokens = 1000
"#;
