//! Screenshot manifest and download statistics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Display type used when a set does not report one.
pub const UNKNOWN_DISPLAY_TYPE: &str = "UNKNOWN";

/// Manifest file written next to a locale's metadata.
pub const MANIFEST_FILE_NAME: &str = "screenshots.json";

/// Index of the screenshots downloaded for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotManifest {
    pub locale: String,
    pub sets: Vec<ManifestSet>,
}

impl ScreenshotManifest {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            sets: Vec::new(),
        }
    }
}

/// One screenshot set within a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSet {
    pub set_id: String,
    pub display_type: String,
    pub items: Vec<ManifestItem>,
}

/// A successfully downloaded screenshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestItem {
    pub id: String,
    /// Path relative to the locale directory, with `/` separators.
    pub file: String,
    pub url: String,
}

/// Counters for one locale's screenshot download.
///
/// `succeeded + failed == total`, and the per-display-type counts sum to
/// `succeeded`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub by_display_type: IndexMap<String, usize>,
}

impl ScreenshotStats {
    pub(crate) fn record_success(&mut self, display_type: &str) {
        self.total += 1;
        self.succeeded += 1;
        *self
            .by_display_type
            .entry(display_type.to_string())
            .or_insert(0) += 1;
    }

    pub(crate) fn record_failure(&mut self) {
        self.total += 1;
        self.failed += 1;
    }

    /// Adds another locale's counters to these.
    pub fn merge(&mut self, other: &ScreenshotStats) {
        self.total += other.total;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        for (display_type, count) in &other.by_display_type {
            *self.by_display_type.entry(display_type.clone()).or_insert(0) += count;
        }
    }
}
