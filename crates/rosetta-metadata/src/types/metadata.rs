//! Listing metadata types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Character limits for App Store listing fields.
pub mod limits {
    /// Maximum characters for app name.
    pub const NAME_MAX: usize = 30;
    /// Maximum characters for subtitle.
    pub const SUBTITLE_MAX: usize = 30;
    /// Maximum characters for description.
    pub const DESCRIPTION_MAX: usize = 4000;
    /// Descriptions shorter than this draw a warning.
    pub const DESCRIPTION_MIN: usize = 10;
    /// Maximum characters for keywords.
    pub const KEYWORDS_MAX: usize = 100;
    /// Maximum characters for what's new.
    pub const WHATS_NEW_MAX: usize = 4000;
}

/// Version string used when the store does not report one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Name used when the store does not report the app's name.
pub const UNKNOWN_APP_NAME: &str = "Unknown App";

/// Metadata for one (app, locale) pair, as supplied for upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMetadata {
    /// Bundle identifier.
    pub app_id: String,
    /// Locale code (e.g., "en-US", "zh-Hans").
    pub locale: String,
    /// App name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comma-separated keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Release notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whats_new: Option<String>,
    /// Local screenshot files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub screenshots: Vec<PathBuf>,
}

impl AppMetadata {
    /// Creates metadata for an app and locale with no fields set.
    pub fn new(app_id: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            locale: locale.into(),
            ..Default::default()
        }
    }

    /// Builds upload metadata from a cached locale entry.
    pub fn from_locale(
        app_id: impl Into<String>,
        locale: impl Into<String>,
        fields: &LocaleMetadata,
    ) -> Self {
        fn non_empty(value: &str) -> Option<String> {
            (!value.is_empty()).then(|| value.to_string())
        }

        Self {
            app_id: app_id.into(),
            locale: locale.into(),
            name: non_empty(&fields.name),
            subtitle: non_empty(&fields.subtitle),
            description: non_empty(&fields.description),
            keywords: non_empty(&fields.keywords),
            whats_new: non_empty(&fields.whats_new),
            screenshots: Vec::new(),
        }
    }

    /// Returns true if screenshots are attached.
    pub fn has_screenshots(&self) -> bool {
        !self.screenshots.is_empty()
    }
}

/// The five text fields of one localization.
///
/// Every field is always present; missing upstream values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocaleMetadata {
    /// App name.
    pub name: String,
    /// Subtitle.
    pub subtitle: String,
    /// Description.
    pub description: String,
    /// Comma-separated keywords.
    pub keywords: String,
    /// Release notes.
    pub whats_new: String,
}

impl LocaleMetadata {
    /// Creates a locale entry from its five fields.
    pub fn new(
        name: impl Into<String>,
        subtitle: impl Into<String>,
        description: impl Into<String>,
        keywords: impl Into<String>,
        whats_new: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            subtitle: subtitle.into(),
            description: description.into(),
            keywords: keywords.into(),
            whats_new: whats_new.into(),
        }
    }

    /// Field names paired with values, in cache order.
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("name", &self.name),
            ("subtitle", &self.subtitle),
            ("description", &self.description),
            ("keywords", &self.keywords),
            ("whatsNew", &self.whats_new),
        ]
    }
}

/// Everything a download produced for one app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResult {
    /// Bundle identifier.
    pub app_id: String,
    /// Discovered locales, in discovery order.
    pub locales: Vec<String>,
    /// Metadata by locale.
    pub metadata: IndexMap<String, LocaleMetadata>,
    /// Store version the metadata belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    /// Project default locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_locale: Option<String>,
}

impl DownloadResult {
    /// Creates an empty result for an app.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            ..Default::default()
        }
    }

    /// Returns the entry for `locale`, registering the locale on first use.
    pub fn locale_mut(&mut self, locale: &str) -> &mut LocaleMetadata {
        if !self.metadata.contains_key(locale) {
            self.locales.push(locale.to_string());
        }
        self.metadata.entry(locale.to_string()).or_default()
    }

    /// Returns the entry for `locale`.
    pub fn get(&self, locale: &str) -> Option<&LocaleMetadata> {
        self.metadata.get(locale)
    }

    /// Returns true if no locale was discovered.
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// Version string, defaulting to `1.0.0`.
    pub fn version(&self) -> &str {
        self.app_version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    /// Guarantees at least one locale and a name on every locale.
    ///
    /// With no discovered locale a single `en-US` entry named after the app
    /// is created.
    pub fn fill_missing(&mut self, app_name: &str) {
        if self.locales.is_empty() {
            self.locale_mut("en-US").name = app_name.to_string();
        }

        for locale in &self.locales {
            let entry = self.metadata.entry(locale.clone()).or_default();
            if entry.name.is_empty() {
                entry.name = app_name.to_string();
            }
        }
    }

    /// Fixed payload served when App Store Connect is unreachable.
    pub fn mock(app_id: impl Into<String>) -> Self {
        let mut result = Self::new(app_id);

        *result.locale_mut("en-US") = LocaleMetadata::new(
            "JustTime",
            "",
            "A simple and elegant time tracking app for productivity.",
            "time,tracking,productivity,work,timer",
            "Bug fixes and performance improvements.",
        );
        *result.locale_mut("zh-Hans") = LocaleMetadata::new(
            "时间追踪",
            "",
            "简洁优雅的时间追踪应用，提升您的工作效率。",
            "时间,追踪,效率,工作,计时器",
            "修复错误并提升性能。",
        );
        *result.locale_mut("fr-FR") = LocaleMetadata::new(
            "JustTime",
            "",
            "Une application simple et élégante pour le suivi du temps et la productivité.",
            "temps,suivi,productivité,travail,minuteur",
            "Corrections de bogues et améliorations de performance.",
        );
        *result.locale_mut("de-DE") = LocaleMetadata::new(
            "JustTime",
            "",
            "Eine einfache und elegante Zeiterfassungs-App für mehr Produktivität.",
            "zeit,erfassung,produktivität,arbeit,timer",
            "Fehlerbehebungen und Leistungsverbesserungen.",
        );

        result
    }
}

/// Result of an upload call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// True when nothing failed.
    pub success: bool,
    /// Number of files or localizations written.
    pub uploaded_files: usize,
    /// Summary message.
    pub message: String,
    /// Per-item failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl UploadResult {
    /// A fully successful upload.
    pub fn succeeded(uploaded_files: usize, message: impl Into<String>) -> Self {
        Self {
            success: true,
            uploaded_files,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// A failed upload.
    pub fn failed(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            uploaded_files: 0,
            message: message.into(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_order_is_insertion_order() {
        let mut result = DownloadResult::new("com.example.app");
        result.locale_mut("fr-FR").name = "Nom".to_string();
        result.locale_mut("de-DE");
        result.locale_mut("fr-FR").subtitle = "Sous-titre".to_string();

        assert_eq!(result.locales, vec!["fr-FR", "de-DE"]);
        assert_eq!(result.get("fr-FR").unwrap().name, "Nom");
        assert_eq!(result.get("fr-FR").unwrap().subtitle, "Sous-titre");
    }

    #[test]
    fn test_fill_missing_creates_en_us() {
        let mut result = DownloadResult::new("com.example.app");
        result.fill_missing("My App");

        assert_eq!(result.locales, vec!["en-US"]);
        let entry = result.get("en-US").unwrap();
        assert_eq!(entry.name, "My App");
        assert_eq!(entry.description, "");
        assert_eq!(entry.whats_new, "");
    }

    #[test]
    fn test_fill_missing_names_unnamed_locales() {
        let mut result = DownloadResult::new("com.example.app");
        result.locale_mut("ja").description = "説明".to_string();
        result.fill_missing("My App");

        assert_eq!(result.locales, vec!["ja"]);
        assert_eq!(result.get("ja").unwrap().name, "My App");
    }

    #[test]
    fn test_mock_payload() {
        let mock = DownloadResult::mock("com.example.app");
        assert_eq!(mock.locales, vec!["en-US", "zh-Hans", "fr-FR", "de-DE"]);
        assert_eq!(mock.get("zh-Hans").unwrap().whats_new, "修复错误并提升性能。");
        assert_eq!(mock.version(), "1.0.0");
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(LocaleMetadata::new("a", "b", "c", "d", "e")).unwrap();
        assert_eq!(json["whatsNew"], "e");

        let metadata: AppMetadata = serde_json::from_value(serde_json::json!({
            "appId": "com.example.app",
            "locale": "en-US",
            "whatsNew": "Fixes"
        }))
        .unwrap();
        assert_eq!(metadata.whats_new.as_deref(), Some("Fixes"));
        assert!(!metadata.has_screenshots());
    }
}
