//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::ProjectConfig;

/// Validate project configuration
pub fn validate_config(config: &ProjectConfig) -> Result<()> {
    debug!("validating configuration");
    validate_app(config)?;
    validate_ai(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_app(config: &ProjectConfig) -> Result<()> {
    if config.default_locale().is_some_and(|l| l.trim().is_empty()) {
        return Err(ConfigError::InvalidValue {
            field: "app.default_locale".to_string(),
            message: "locale cannot be empty".to_string(),
        }
        .into());
    }

    if config.app.bundle_id.as_deref().is_some_and(|b| b.trim().is_empty()) {
        return Err(ConfigError::InvalidValue {
            field: "app.bundle_id".to_string(),
            message: "bundle id cannot be empty".to_string(),
        }
        .into());
    }

    for (i, locale) in config.app.target_locales.iter().enumerate() {
        if locale.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("app.target_locales[{}]", i),
                message: "locale cannot be empty".to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_ai(config: &ProjectConfig) -> Result<()> {
    if config.ai.provider != "openai" {
        return Err(ConfigError::InvalidValue {
            field: "ai.provider".to_string(),
            message: "must be one of: openai".to_string(),
        }
        .into());
    }

    if !(0.0..=2.0).contains(&config.ai.temperature) {
        return Err(ConfigError::InvalidValue {
            field: "ai.temperature".to_string(),
            message: "must be between 0.0 and 2.0".to_string(),
        }
        .into());
    }

    if config.ai.max_tokens == 0 {
        return Err(ConfigError::InvalidValue {
            field: "ai.max_tokens".to_string(),
            message: "must be greater than zero".to_string(),
        }
        .into());
    }

    Ok(())
}
