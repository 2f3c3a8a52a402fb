//! In-memory App Store Connect backend for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::resources::*;
use super::ConnectBackend;
use crate::{MetadataError, Result};

#[derive(Default)]
pub(crate) struct FakeState {
    pub apps: Vec<AppResource>,
    pub app_infos: HashMap<String, Vec<AppInfoResource>>,
    pub app_info_localizations: HashMap<String, Vec<AppInfoLocalizationResource>>,
    pub versions: HashMap<String, Vec<VersionResource>>,
    pub version_localizations: HashMap<String, Vec<VersionLocalizationResource>>,
    pub screenshot_sets: HashMap<String, Vec<ScreenshotSetResource>>,
    pub screenshots: HashMap<String, Vec<ScreenshotResource>>,
    /// Operation names that return a server error.
    pub failing: HashSet<&'static str>,
    /// Log of write calls, e.g. `update_version_localization:loc-1`.
    pub writes: Vec<String>,
    next_id: usize,
}

impl FakeState {
    pub fn add_app(&mut self, id: &str, bundle_id: &str, name: Option<&str>) {
        self.apps.push(Resource::new(
            id,
            AppAttributes {
                name: name.map(str::to_string),
                bundle_id: Some(bundle_id.to_string()),
                primary_locale: None,
            },
        ));
    }

    pub fn add_version(&mut self, app_id: &str, id: &str, version: &str, state: &str) {
        self.versions.entry(app_id.to_string()).or_default().push(Resource::new(
            id,
            VersionAttributes {
                platform: Some("IOS".to_string()),
                version_string: Some(version.to_string()),
                app_store_state: Some(state.to_string()),
                created_date: Some("2024-01-01T00:00:00Z".to_string()),
                downloadable: Some(true),
                release_type: Some("MANUAL".to_string()),
            },
        ));
    }

    pub fn add_app_info_localization(&mut self, info_id: &str, id: &str, locale: &str, name: Option<&str>, subtitle: Option<&str>) {
        self.app_info_localizations
            .entry(info_id.to_string())
            .or_default()
            .push(Resource::new(
                id,
                AppInfoLocalizationAttributes {
                    locale: Some(locale.to_string()),
                    name: name.map(str::to_string),
                    subtitle: subtitle.map(str::to_string),
                },
            ));
    }

    pub fn add_version_localization(&mut self, version_id: &str, id: &str, locale: &str, description: &str, keywords: &str, whats_new: &str) {
        self.version_localizations
            .entry(version_id.to_string())
            .or_default()
            .push(Resource::new(
                id,
                VersionLocalizationAttributes {
                    locale: Some(locale.to_string()),
                    description: Some(description.to_string()),
                    keywords: Some(keywords.to_string()),
                    whats_new: Some(whats_new.to_string()),
                    promotional_text: None,
                },
            ));
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

#[derive(Default)]
pub(crate) struct FakeConnect {
    state: Mutex<FakeState>,
}

impl FakeConnect {
    pub fn with(setup: impl FnOnce(&mut FakeState)) -> Self {
        let mut state = FakeState::default();
        setup(&mut state);
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn lock_state(&self, change: impl FnOnce(&mut FakeState)) {
        change(&mut self.lock());
    }

    pub fn writes(&self) -> Vec<String> {
        self.lock().writes.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        if self.lock().failing.contains(operation) {
            return Err(MetadataError::Api {
                status: 500,
                message: format!("{} failed", operation),
            });
        }
        Ok(())
    }

    fn record(&self, entry: String) {
        self.lock().writes.push(entry);
    }
}

#[async_trait]
impl ConnectBackend for FakeConnect {
    async fn find_app(&self, bundle_id: &str) -> Result<Option<AppResource>> {
        self.check("find_app")?;
        Ok(self
            .lock()
            .apps
            .iter()
            .find(|app| app.attributes.bundle_id.as_deref() == Some(bundle_id))
            .cloned())
    }

    async fn app_infos(&self, app_id: &str) -> Result<Vec<AppInfoResource>> {
        self.check("app_infos")?;
        Ok(self.lock().app_infos.get(app_id).cloned().unwrap_or_default())
    }

    async fn app_info_localizations(&self, app_info_id: &str) -> Result<Vec<AppInfoLocalizationResource>> {
        self.check("app_info_localizations")?;
        Ok(self
            .lock()
            .app_info_localizations
            .get(app_info_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn app_store_versions(&self, app_id: &str, states: &[&str], limit: usize) -> Result<Vec<VersionResource>> {
        self.check("app_store_versions")?;
        Ok(self
            .lock()
            .versions
            .get(app_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|v| {
                states.is_empty()
                    || v.attributes
                        .app_store_state
                        .as_deref()
                        .is_some_and(|s| states.contains(&s))
            })
            .take(limit)
            .collect())
    }

    async fn version_localizations(&self, version_id: &str) -> Result<Vec<VersionLocalizationResource>> {
        self.check("version_localizations")?;
        Ok(self
            .lock()
            .version_localizations
            .get(version_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn screenshot_sets(&self, version_localization_id: &str) -> Result<Vec<ScreenshotSetResource>> {
        self.check("screenshot_sets")?;
        Ok(self
            .lock()
            .screenshot_sets
            .get(version_localization_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn screenshots(&self, set_id: &str) -> Result<Vec<ScreenshotResource>> {
        self.check("screenshots")?;
        Ok(self.lock().screenshots.get(set_id).cloned().unwrap_or_default())
    }

    async fn update_version_localization(&self, localization_id: &str, _update: &LocalizationUpdate) -> Result<()> {
        self.check("update_version_localization")?;
        self.record(format!("update_version_localization:{}", localization_id));
        Ok(())
    }

    async fn create_version_localization(&self, version_id: &str, locale: &str, _update: &LocalizationUpdate) -> Result<String> {
        self.check("create_version_localization")?;
        let id = self.lock().next_id("vloc");
        self.record(format!("create_version_localization:{}:{}", version_id, locale));
        Ok(id)
    }

    async fn update_app_info_localization(&self, localization_id: &str, _name: Option<&str>, _subtitle: Option<&str>) -> Result<()> {
        self.check("update_app_info_localization")?;
        self.record(format!("update_app_info_localization:{}", localization_id));
        Ok(())
    }

    async fn create_app_info_localization(&self, app_info_id: &str, locale: &str, name: Option<&str>, subtitle: Option<&str>) -> Result<String> {
        self.check("create_app_info_localization")?;
        let mut state = self.lock();
        let id = state.next_id("ail");
        state.add_app_info_localization(app_info_id, &id, locale, name, subtitle);
        drop(state);
        self.record(format!("create_app_info_localization:{}:{}", app_info_id, locale));
        Ok(id)
    }

    async fn create_screenshot_set(&self, version_localization_id: &str, display_type: &str) -> Result<String> {
        self.check("create_screenshot_set")?;
        let mut state = self.lock();
        let id = state.next_id("set");
        state
            .screenshot_sets
            .entry(version_localization_id.to_string())
            .or_default()
            .push(Resource::new(
                id.clone(),
                ScreenshotSetAttributes {
                    screenshot_display_type: Some(display_type.to_string()),
                },
            ));
        state.writes.push(format!("create_screenshot_set:{}", display_type));
        Ok(id)
    }

    async fn reserve_screenshot(&self, set_id: &str, file_name: &str, file_size: u64) -> Result<ScreenshotResource> {
        self.check("reserve_screenshot")?;
        let mut state = self.lock();
        let id = state.next_id("shot");
        state.writes.push(format!("reserve_screenshot:{}:{}", set_id, file_name));
        Ok(Resource::new(
            id.clone(),
            ScreenshotAttributes {
                file_name: Some(file_name.to_string()),
                file_size: Some(file_size),
                upload_operations: Some(vec![UploadOperation {
                    method: Some("PUT".to_string()),
                    url: format!("fake://upload/{}", id),
                    length: file_size,
                    offset: 0,
                    request_headers: Vec::new(),
                }]),
                ..Default::default()
            },
        ))
    }

    async fn upload_asset_part(&self, operation: &UploadOperation, bytes: Vec<u8>) -> Result<()> {
        self.check("upload_asset_part")?;
        self.record(format!("upload_asset_part:{}:{}", operation.url, bytes.len()));
        Ok(())
    }

    async fn commit_screenshot(&self, screenshot_id: &str, checksum: &str) -> Result<()> {
        self.check("commit_screenshot")?;
        self.record(format!("commit_screenshot:{}:{}", screenshot_id, checksum));
        Ok(())
    }
}
