//! Local directory cache.
//!
//! ## Directory Structure
//!
//! ```text
//! <root>/
//! └── {bundle_id}/
//!     ├── app-summary.json
//!     └── {version}/
//!         └── {locale}/
//!             ├── app-name.md
//!             ├── subtitle.md
//!             ├── description.md
//!             ├── keywords.md
//!             ├── whats-new.md
//!             ├── metadata.json
//!             ├── screenshots.json
//!             └── screenshots/
//!                 └── {display_type}/
//!                     └── NN-{file_name}
//! ```
//!
//! Text files are only written for non-empty fields; `metadata.json` always
//! carries all five.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, error, info};

use crate::types::metadata::{DownloadResult, LocaleMetadata};
use crate::utils::now_timestamp;
use crate::{MetadataError, Result};

/// Per-locale JSON snapshot file.
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// App-level summary file.
pub const SUMMARY_FILE_NAME: &str = "app-summary.json";

/// Directory holding downloaded screenshots.
pub const SCREENSHOTS_DIR_NAME: &str = "screenshots";

/// Text file per field, in write order.
const FIELD_FILES: [(&str, fn(&LocaleMetadata) -> &str); 5] = [
    ("app-name.md", |m| m.name.as_str()),
    ("description.md", |m| m.description.as_str()),
    ("keywords.md", |m| m.keywords.as_str()),
    ("whats-new.md", |m| m.whats_new.as_str()),
    ("subtitle.md", |m| m.subtitle.as_str()),
];

/// Contents of `metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleSnapshot {
    pub locale: String,
    pub app_id: String,
    pub version: String,
    pub timestamp: String,
    pub data: LocaleMetadata,
}

/// Contents of `app-summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSummary {
    pub app_id: String,
    pub current_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_locale: Option<String>,
    pub available_locales: Vec<String>,
    pub last_update: String,
}

/// Writer and reader for the on-disk cache.
#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
    debug: bool,
}

impl LocalCache {
    /// Creates a cache rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            debug: false,
        }
    }

    /// Enables per-locale progress logging.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn app_dir(&self, bundle_id: &str) -> PathBuf {
        self.root.join(bundle_id)
    }

    pub fn locale_dir(&self, bundle_id: &str, version: &str, locale: &str) -> PathBuf {
        self.app_dir(bundle_id).join(version).join(locale)
    }

    /// Persists a download result, logging instead of returning failures.
    pub async fn save(&self, result: &DownloadResult) {
        info!(app_id = %result.app_id, "saving data to local cache");
        match self.try_save(result).await {
            Ok(()) => info!(
                path = %self.app_dir(&result.app_id).display(),
                "local cache saved"
            ),
            Err(e) => error!(app_id = %result.app_id, error = %e, "failed to save local cache"),
        }
    }

    /// Persists a download result.
    pub async fn try_save(&self, result: &DownloadResult) -> Result<()> {
        let version = result.version();

        for locale in &result.locales {
            let Some(metadata) = result.metadata.get(locale) else {
                continue;
            };
            self.write_locale(&result.app_id, version, locale, metadata)
                .await?;
        }

        let summary = AppSummary {
            app_id: result.app_id.clone(),
            current_version: version.to_string(),
            default_locale: result.default_locale.clone(),
            available_locales: result.locales.clone(),
            last_update: now_timestamp(),
        };
        self.write_summary(&summary).await
    }

    /// Writes one locale's text files, `metadata.json` and an empty
    /// `screenshots/` directory.
    pub async fn write_locale(
        &self,
        bundle_id: &str,
        version: &str,
        locale: &str,
        metadata: &LocaleMetadata,
    ) -> Result<()> {
        let dir = self.locale_dir(bundle_id, version, locale);
        if self.debug {
            debug!(path = %dir.display(), "creating directory");
        }
        fs::create_dir_all(&dir).await?;

        for (file_name, field) in FIELD_FILES {
            let value = field(metadata);
            if !value.is_empty() {
                fs::write(dir.join(file_name), value).await?;
            }
        }

        let snapshot = LocaleSnapshot {
            locale: locale.to_string(),
            app_id: bundle_id.to_string(),
            version: version.to_string(),
            timestamp: now_timestamp(),
            data: metadata.clone(),
        };
        write_json(&dir.join(METADATA_FILE_NAME), &snapshot).await?;

        fs::create_dir_all(dir.join(SCREENSHOTS_DIR_NAME)).await?;

        if self.debug {
            debug!(locale, path = %dir.display(), "locale saved");
        }
        Ok(())
    }

    /// Writes `app-summary.json`.
    pub async fn write_summary(&self, summary: &AppSummary) -> Result<()> {
        let dir = self.app_dir(&summary.app_id);
        fs::create_dir_all(&dir).await?;
        write_json(&dir.join(SUMMARY_FILE_NAME), summary).await
    }

    /// Reads `app-summary.json`.
    pub async fn load_summary(&self, bundle_id: &str) -> Result<AppSummary> {
        read_json(&self.app_dir(bundle_id).join(SUMMARY_FILE_NAME)).await
    }

    /// Reads a locale's `metadata.json`.
    pub async fn load_snapshot(
        &self,
        bundle_id: &str,
        version: &str,
        locale: &str,
    ) -> Result<LocaleSnapshot> {
        read_json(&self.locale_dir(bundle_id, version, locale).join(METADATA_FILE_NAME)).await
    }

    /// Reads a locale's fields back from `metadata.json`.
    pub async fn load_locale(
        &self,
        bundle_id: &str,
        version: &str,
        locale: &str,
    ) -> Result<LocaleMetadata> {
        Ok(self.load_snapshot(bundle_id, version, locale).await?.data)
    }

    /// Adds locales to the summary's available list, keeping existing order.
    pub async fn register_locales(&self, bundle_id: &str, locales: &[String]) -> Result<AppSummary> {
        let mut summary = self.load_summary(bundle_id).await?;
        for locale in locales {
            if !summary.available_locales.contains(locale) {
                summary.available_locales.push(locale.clone());
            }
        }
        summary.last_update = now_timestamp();
        self.write_summary(&summary).await?;
        Ok(summary)
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).await?;
    Ok(())
}

async fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(MetadataError::NotFound(path.display().to_string()))
        }
        Err(e) => Err(MetadataError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> DownloadResult {
        let mut result = DownloadResult::new("com.example.app");
        result.app_version = Some("2.1.0".to_string());
        result.default_locale = Some("en-US".to_string());
        *result.locale_mut("en-US") =
            LocaleMetadata::new("Example", "", "A long enough description.", "a,b", "");
        *result.locale_mut("ja") = LocaleMetadata::new("例", "サブ", "説明です。", "", "修正");
        result
    }

    #[tokio::test]
    async fn test_save_writes_only_non_empty_fields() {
        let temp = TempDir::new().unwrap();
        let cache = LocalCache::new(temp.path());
        cache.try_save(&sample()).await.unwrap();

        let en = temp.path().join("com.example.app/2.1.0/en-US");
        assert_eq!(std::fs::read_to_string(en.join("app-name.md")).unwrap(), "Example");
        assert!(en.join("description.md").exists());
        assert!(en.join("keywords.md").exists());
        assert!(!en.join("subtitle.md").exists());
        assert!(!en.join("whats-new.md").exists());
        assert!(en.join("screenshots").is_dir());

        let ja = temp.path().join("com.example.app/2.1.0/ja");
        assert!(ja.join("subtitle.md").exists());
        assert!(!ja.join("keywords.md").exists());
    }

    #[tokio::test]
    async fn test_metadata_json_shape() {
        let temp = TempDir::new().unwrap();
        let cache = LocalCache::new(temp.path());
        cache.try_save(&sample()).await.unwrap();

        let raw = std::fs::read_to_string(
            temp.path().join("com.example.app/2.1.0/en-US/metadata.json"),
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(json["locale"], "en-US");
        assert_eq!(json["appId"], "com.example.app");
        assert_eq!(json["version"], "2.1.0");
        assert_eq!(json["data"]["subtitle"], "");
        assert_eq!(json["data"]["whatsNew"], "");
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_summary_round_trip() {
        let temp = TempDir::new().unwrap();
        let cache = LocalCache::new(temp.path());
        cache.try_save(&sample()).await.unwrap();

        let summary = cache.load_summary("com.example.app").await.unwrap();
        assert_eq!(summary.current_version, "2.1.0");
        assert_eq!(summary.default_locale.as_deref(), Some("en-US"));
        assert_eq!(summary.available_locales, vec!["en-US", "ja"]);

        let ja = cache.load_locale("com.example.app", "2.1.0", "ja").await.unwrap();
        assert_eq!(ja.whats_new, "修正");
    }

    #[tokio::test]
    async fn test_version_defaults_to_1_0_0() {
        let temp = TempDir::new().unwrap();
        let cache = LocalCache::new(temp.path());
        let mut result = DownloadResult::new("com.example.app");
        result.fill_missing("Example");
        cache.try_save(&result).await.unwrap();

        assert!(temp
            .path()
            .join("com.example.app/1.0.0/en-US/metadata.json")
            .exists());
    }

    #[tokio::test]
    async fn test_register_locales_appends_new_ones() {
        let temp = TempDir::new().unwrap();
        let cache = LocalCache::new(temp.path());
        cache.try_save(&sample()).await.unwrap();

        let summary = cache
            .register_locales("com.example.app", &["ja".to_string(), "fr-FR".to_string()])
            .await
            .unwrap();
        assert_eq!(summary.available_locales, vec!["en-US", "ja", "fr-FR"]);
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_not_found() {
        let temp = TempDir::new().unwrap();
        let cache = LocalCache::new(temp.path());
        let err = cache.load_locale("com.example.app", "1.0.0", "en-US").await.unwrap_err();
        assert!(matches!(err, MetadataError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_save_swallows_errors() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        // root is a regular file, so every write fails
        let cache = LocalCache::new(&blocker);
        cache.save(&sample()).await;
        assert!(cache.try_save(&sample()).await.is_err());
    }
}
