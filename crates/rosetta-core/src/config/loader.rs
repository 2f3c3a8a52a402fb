//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::CONFIG_FILE_NAME;
use super::types::ProjectConfig;
use super::validation::validate_config;

/// Load project configuration from a file
pub fn load_config(path: &Path) -> Result<ProjectConfig> {
    info!(path = %path.display(), "loading config");

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()).into());
    }

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ProjectConfig = toml::from_str(&content).map_err(ConfigError::TomlError)?;

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Path of `rosetta.toml` inside `dir`, if present
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    path.is_file().then_some(path)
}

/// Load configuration from `dir`, falling back to defaults
pub fn load_config_or_default(dir: &Path) -> (ProjectConfig, Option<PathBuf>) {
    let Some(path) = find_config(dir) else {
        debug!(dir = %dir.display(), "no rosetta.toml, using defaults");
        return (ProjectConfig::default(), None);
    };

    match load_config(&path) {
        Ok(config) => (config, Some(path)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read rosetta.toml, using defaults");
            (ProjectConfig::default(), None)
        }
    }
}

/// Write project configuration
pub fn save_config(path: &Path, config: &ProjectConfig) -> Result<()> {
    let content = toml::to_string_pretty(config).map_err(ConfigError::TomlSerialize)?;
    std::fs::write(path, content).map_err(ConfigError::Io)?;
    info!(path = %path.display(), "config written");
    Ok(())
}
