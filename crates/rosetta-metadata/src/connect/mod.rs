//! App Store Connect access.
//!
//! [`ConnectBackend`] is the seam between the metadata workflows and the
//! network. [`AppStoreConnectClient`] is the live implementation; tests plug
//! in an in-memory one.

mod api;
pub mod resources;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
pub use api::{AppStoreConnectClient, DEFAULT_API_BASE_URL};
use resources::*;

/// Operations Rosetta needs from App Store Connect.
#[async_trait]
pub trait ConnectBackend: Send + Sync {
    /// Finds the app with the given bundle id.
    async fn find_app(&self, bundle_id: &str) -> Result<Option<AppResource>>;

    /// App infos of an app.
    async fn app_infos(&self, app_id: &str) -> Result<Vec<AppInfoResource>>;

    /// Localizations of an app info (name, subtitle).
    async fn app_info_localizations(
        &self,
        app_info_id: &str,
    ) -> Result<Vec<AppInfoLocalizationResource>>;

    /// Versions of an app, most recent first.
    ///
    /// An empty `states` slice applies no state filter. At most `limit`
    /// versions are returned.
    async fn app_store_versions(
        &self,
        app_id: &str,
        states: &[&str],
        limit: usize,
    ) -> Result<Vec<VersionResource>>;

    /// Localizations of a version (description, keywords, what's new).
    async fn version_localizations(
        &self,
        version_id: &str,
    ) -> Result<Vec<VersionLocalizationResource>>;

    /// Screenshot sets of a version localization.
    async fn screenshot_sets(
        &self,
        version_localization_id: &str,
    ) -> Result<Vec<ScreenshotSetResource>>;

    /// Screenshots of a set.
    async fn screenshots(&self, set_id: &str) -> Result<Vec<ScreenshotResource>>;

    async fn update_version_localization(
        &self,
        localization_id: &str,
        update: &LocalizationUpdate,
    ) -> Result<()>;

    /// Creates a version localization and returns its id.
    async fn create_version_localization(
        &self,
        version_id: &str,
        locale: &str,
        update: &LocalizationUpdate,
    ) -> Result<String>;

    async fn update_app_info_localization(
        &self,
        localization_id: &str,
        name: Option<&str>,
        subtitle: Option<&str>,
    ) -> Result<()>;

    /// Creates an app info localization and returns its id.
    async fn create_app_info_localization(
        &self,
        app_info_id: &str,
        locale: &str,
        name: Option<&str>,
        subtitle: Option<&str>,
    ) -> Result<String>;

    /// Creates a screenshot set and returns its id.
    async fn create_screenshot_set(
        &self,
        version_localization_id: &str,
        display_type: &str,
    ) -> Result<String>;

    /// Reserves an upload slot; the returned resource carries the upload operations.
    async fn reserve_screenshot(
        &self,
        set_id: &str,
        file_name: &str,
        file_size: u64,
    ) -> Result<ScreenshotResource>;

    /// Sends one part of a reserved upload.
    async fn upload_asset_part(&self, operation: &UploadOperation, bytes: Vec<u8>) -> Result<()>;

    /// Marks a reserved screenshot as uploaded.
    async fn commit_screenshot(&self, screenshot_id: &str, checksum: &str) -> Result<()>;
}

/// Whether Rosetta talks to App Store Connect.
#[derive(Clone)]
pub enum ConnectMode {
    /// Authenticated access through a backend.
    Live(Arc<dyn ConnectBackend>),
    /// No credentials; reads serve mock data and writes are simulated.
    Offline,
}

impl ConnectMode {
    pub fn live(backend: impl ConnectBackend + 'static) -> Self {
        Self::Live(Arc::new(backend))
    }

    pub fn backend(&self) -> Option<&Arc<dyn ConnectBackend>> {
        match self {
            Self::Live(backend) => Some(backend),
            Self::Offline => None,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}

impl std::fmt::Debug for ConnectMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live(_) => f.write_str("ConnectMode::Live"),
            Self::Offline => f.write_str("ConnectMode::Offline"),
        }
    }
}
