//! Pushing metadata and screenshots to App Store Connect.

use std::collections::HashMap;
use std::path::Path;

use rosetta_core::Outcome;
use tokio::fs;
use tracing::{debug, info, warn};

use super::{AppStoreService, OFFLINE_REASON};
use crate::connect::resources::{LocalizationUpdate, VersionResource};
use crate::connect::ConnectBackend;
use crate::types::metadata::{AppMetadata, UploadResult};
use crate::types::status::AppStoreState;
use crate::{MetadataError, Result};

impl AppStoreService {
    /// Uploads `metadata`: its screenshots when any are attached, its text
    /// fields otherwise.
    ///
    /// Offline, the upload is simulated and reported as degraded.
    pub async fn upload(&self, metadata: &AppMetadata) -> Outcome<UploadResult> {
        if metadata.has_screenshots() {
            self.upload_screenshots(metadata).await
        } else {
            self.upload_metadata(metadata).await
        }
    }

    async fn upload_metadata(&self, metadata: &AppMetadata) -> Outcome<UploadResult> {
        info!(app_id = %metadata.app_id, locale = %metadata.locale, "uploading metadata");

        let Some(backend) = self.mode.backend() else {
            let fields = [
                &metadata.name,
                &metadata.subtitle,
                &metadata.description,
                &metadata.keywords,
                &metadata.whats_new,
            ]
            .iter()
            .filter(|f| f.is_some())
            .count();
            return Outcome::degraded(
                UploadResult::succeeded(
                    fields,
                    format!("Simulated metadata upload for {}", metadata.locale),
                ),
                format!("{}; upload simulated", OFFLINE_REASON),
            );
        };

        match self.push_metadata(backend.as_ref(), metadata).await {
            Ok(result) if result.errors.is_empty() => Outcome::Ok(result),
            Ok(result) => {
                let reason = result.errors.join("; ");
                Outcome::degraded(result, reason)
            }
            Err(e) => {
                warn!(error = %e, "metadata upload failed");
                Outcome::fatal(format!("Metadata upload failed: {}", e))
            }
        }
    }

    async fn push_metadata(
        &self,
        backend: &dyn ConnectBackend,
        metadata: &AppMetadata,
    ) -> Result<UploadResult> {
        let app_id = find_app_id(backend, &metadata.app_id).await?;
        let version = editable_version(backend, &app_id).await?;
        let mut uploaded = 0;
        let mut errors = Vec::new();

        let update = LocalizationUpdate {
            description: metadata.description.clone(),
            keywords: metadata.keywords.clone(),
            whats_new: metadata.whats_new.clone(),
        };

        if !update.is_empty() {
            let localizations = backend.version_localizations(&version.id).await?;
            let existing = localizations
                .iter()
                .find(|l| l.attributes.locale.as_deref() == Some(metadata.locale.as_str()));

            match existing {
                Some(localization) => {
                    backend
                        .update_version_localization(&localization.id, &update)
                        .await?;
                    debug!(locale = %metadata.locale, id = %localization.id, "updated version localization");
                }
                None => {
                    let id = backend
                        .create_version_localization(&version.id, &metadata.locale, &update)
                        .await?;
                    debug!(locale = %metadata.locale, id = %id, "created version localization");
                }
            }
            uploaded += 1;
        }

        if metadata.name.is_some() || metadata.subtitle.is_some() {
            match self.push_app_info(backend, &app_id, metadata).await {
                Ok(()) => uploaded += 1,
                Err(e) => {
                    warn!(locale = %metadata.locale, error = %e, "failed to update app info");
                    errors.push(format!("app info: {}", e));
                }
            }
        }

        info!(locale = %metadata.locale, uploaded, "metadata uploaded");
        Ok(UploadResult {
            success: errors.is_empty(),
            uploaded_files: uploaded,
            message: format!(
                "Updated {} localization(s) for {}",
                uploaded, metadata.locale
            ),
            errors,
        })
    }

    async fn push_app_info(
        &self,
        backend: &dyn ConnectBackend,
        app_id: &str,
        metadata: &AppMetadata,
    ) -> Result<()> {
        let infos = backend.app_infos(app_id).await?;
        let info = infos
            .first()
            .ok_or_else(|| MetadataError::NotFound("No app info found".to_string()))?;

        let localizations = backend.app_info_localizations(&info.id).await?;
        let existing = localizations
            .iter()
            .find(|l| l.attributes.locale.as_deref() == Some(metadata.locale.as_str()));

        match existing {
            Some(localization) => {
                backend
                    .update_app_info_localization(
                        &localization.id,
                        metadata.name.as_deref(),
                        metadata.subtitle.as_deref(),
                    )
                    .await
            }
            None => {
                let id = backend
                    .create_app_info_localization(
                        &info.id,
                        &metadata.locale,
                        metadata.name.as_deref(),
                        metadata.subtitle.as_deref(),
                    )
                    .await?;
                debug!(locale = %metadata.locale, id = %id, "created app info localization");
                Ok(())
            }
        }
    }

    async fn upload_screenshots(&self, metadata: &AppMetadata) -> Outcome<UploadResult> {
        let count = metadata.screenshots.len();
        info!(app_id = %metadata.app_id, locale = %metadata.locale, count, "uploading screenshots");

        let Some(backend) = self.mode.backend() else {
            return Outcome::degraded(
                UploadResult::succeeded(
                    count,
                    format!("Simulated upload of {} screenshots for {}", count, metadata.locale),
                ),
                format!("{}; upload simulated", OFFLINE_REASON),
            );
        };

        match self.push_screenshots(backend.as_ref(), metadata).await {
            Ok(result) if result.errors.is_empty() => Outcome::Ok(result),
            Ok(result) => {
                let reason = format!(
                    "{} of {} screenshots failed",
                    result.errors.len(),
                    count
                );
                Outcome::degraded(result, reason)
            }
            Err(e) => {
                warn!(error = %e, "screenshot upload failed");
                Outcome::fatal(format!("Screenshot upload failed: {}", e))
            }
        }
    }

    async fn push_screenshots(
        &self,
        backend: &dyn ConnectBackend,
        metadata: &AppMetadata,
    ) -> Result<UploadResult> {
        let app_id = find_app_id(backend, &metadata.app_id).await?;
        let version = editable_version(backend, &app_id).await?;

        let localizations = backend.version_localizations(&version.id).await?;
        let localization_id = match localizations
            .iter()
            .find(|l| l.attributes.locale.as_deref() == Some(metadata.locale.as_str()))
        {
            Some(localization) => localization.id.clone(),
            None => {
                backend
                    .create_version_localization(
                        &version.id,
                        &metadata.locale,
                        &LocalizationUpdate::default(),
                    )
                    .await?
            }
        };

        let mut sets: HashMap<String, String> = backend
            .screenshot_sets(&localization_id)
            .await?
            .into_iter()
            .filter_map(|set| {
                set.attributes
                    .screenshot_display_type
                    .map(|display_type| (display_type, set.id))
            })
            .collect();

        let mut uploaded = 0;
        let mut errors = Vec::new();

        for path in &metadata.screenshots {
            match upload_one(backend, &localization_id, &mut sets, path).await {
                Ok(()) => {
                    uploaded += 1;
                    info!(file = %path.display(), "screenshot uploaded");
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "screenshot upload failed");
                    errors.push(format!("{}: {}", path.display(), e));
                }
            }
        }

        Ok(UploadResult {
            success: errors.is_empty(),
            uploaded_files: uploaded,
            message: format!(
                "Uploaded {} of {} screenshots for {}",
                uploaded,
                metadata.screenshots.len(),
                metadata.locale
            ),
            errors,
        })
    }
}

async fn find_app_id(backend: &dyn ConnectBackend, bundle_id: &str) -> Result<String> {
    backend
        .find_app(bundle_id)
        .await?
        .map(|app| app.id)
        .ok_or_else(|| MetadataError::NotFound(format!("App with bundle ID {} not found", bundle_id)))
}

async fn editable_version(backend: &dyn ConnectBackend, app_id: &str) -> Result<VersionResource> {
    backend
        .app_store_versions(app_id, &AppStoreState::EDITABLE, 1)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| {
            MetadataError::SyncError(
                "No editable App Store version found. Create a new version first.".to_string(),
            )
        })
}

/// Display type of a screenshot, taken from its parent directory as laid
/// out by the local cache (`screenshots/<displayType>/<file>`).
fn display_type_for(path: &Path) -> Option<String> {
    let parent = path.parent()?.file_name()?.to_str()?;
    if parent.is_empty() || parent == "screenshots" || parent == "UNKNOWN" {
        return None;
    }
    Some(parent.to_string())
}

/// Reserve, upload and commit one screenshot.
async fn upload_one(
    backend: &dyn ConnectBackend,
    localization_id: &str,
    sets: &mut HashMap<String, String>,
    path: &Path,
) -> Result<()> {
    let display_type = display_type_for(path).ok_or_else(|| {
        MetadataError::InvalidFormat("cannot determine screenshot display type".to_string())
    })?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| MetadataError::InvalidFormat("invalid file name".to_string()))?;

    let bytes = fs::read(path).await?;

    let set_id = match sets.get(&display_type) {
        Some(id) => id.clone(),
        None => {
            let id = backend
                .create_screenshot_set(localization_id, &display_type)
                .await?;
            sets.insert(display_type.clone(), id.clone());
            id
        }
    };

    let reserved = backend
        .reserve_screenshot(&set_id, file_name, bytes.len() as u64)
        .await?;
    let operations = reserved.attributes.upload_operations.unwrap_or_default();
    if operations.is_empty() {
        return Err(MetadataError::SyncError(
            "reservation returned no upload operations".to_string(),
        ));
    }

    for operation in &operations {
        let start = usize::try_from(operation.offset).unwrap_or(usize::MAX);
        let end = start.saturating_add(usize::try_from(operation.length).unwrap_or(usize::MAX));
        let part = bytes.get(start..end).ok_or_else(|| {
            MetadataError::SyncError(format!(
                "upload operation out of range ({}..{} of {} bytes)",
                start,
                end,
                bytes.len()
            ))
        })?;
        backend.upload_asset_part(operation, part.to_vec()).await?;
    }

    let checksum = format!("{:x}", md5::compute(&bytes));
    backend.commit_screenshot(&reserved.id, &checksum).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LocalCache;
    use crate::connect::fake::FakeConnect;
    use crate::connect::ConnectMode;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn editable_app() -> Arc<FakeConnect> {
        Arc::new(FakeConnect::with(|state| {
            state.add_app("app-1", "com.example.app", Some("Example"));
            state.add_version("app-1", "ver-live", "1.0", "READY_FOR_SALE");
            state.add_version("app-1", "ver-next", "1.1", "PREPARE_FOR_SUBMISSION");
            state.add_version_localization("ver-next", "vl-en", "en-US", "Old", "old", "");
            state.app_infos.insert(
                "app-1".to_string(),
                vec![crate::connect::resources::Resource::new(
                    "info-1",
                    Default::default(),
                )],
            );
            state.add_app_info_localization("info-1", "ail-en", "en-US", Some("Example"), None);
        }))
    }

    fn service(fake: &Arc<FakeConnect>) -> AppStoreService {
        AppStoreService::new(ConnectMode::Live(fake.clone()), LocalCache::new("."), "en-US")
    }

    #[tokio::test]
    async fn test_offline_upload_is_simulated() {
        let service = AppStoreService::new(ConnectMode::Offline, LocalCache::new("."), "en-US");
        let mut metadata = AppMetadata::new("com.example.app", "fr-FR");
        metadata.description = Some("Description".to_string());
        metadata.keywords = Some("a,b".to_string());

        let outcome = service.upload(&metadata).await;
        assert!(outcome.is_degraded());
        let result = outcome.into_value().unwrap();
        assert!(result.success);
        assert_eq!(result.uploaded_files, 2);
    }

    #[tokio::test]
    async fn test_updates_existing_localization_and_app_info() {
        let fake = editable_app();
        let mut metadata = AppMetadata::new("com.example.app", "en-US");
        metadata.name = Some("Example Pro".to_string());
        metadata.whats_new = Some("New things".to_string());

        let outcome = service(&fake).upload(&metadata).await;
        assert!(outcome.is_ok(), "{:?}", outcome.reason());
        assert_eq!(outcome.value().unwrap().uploaded_files, 2);
        assert_eq!(
            fake.writes(),
            vec![
                "update_version_localization:vl-en",
                "update_app_info_localization:ail-en"
            ]
        );
    }

    #[tokio::test]
    async fn test_creates_missing_localization() {
        let fake = editable_app();
        let mut metadata = AppMetadata::new("com.example.app", "de-DE");
        metadata.description = Some("Beschreibung".to_string());

        let outcome = service(&fake).upload(&metadata).await;
        assert!(outcome.is_ok());
        assert_eq!(
            fake.writes(),
            vec!["create_version_localization:ver-next:de-DE"]
        );
    }

    #[tokio::test]
    async fn test_creates_missing_app_info_localization() {
        let fake = editable_app();
        let mut metadata = AppMetadata::new("com.example.app", "it-IT");
        metadata.name = Some("Esempio".to_string());
        metadata.subtitle = Some("Tempo".to_string());
        metadata.description = Some("Descrizione".to_string());

        let outcome = service(&fake).upload(&metadata).await;
        assert!(outcome.is_ok(), "{:?}", outcome.reason());
        assert_eq!(outcome.value().unwrap().uploaded_files, 2);
        assert_eq!(
            fake.writes(),
            vec![
                "create_version_localization:ver-next:it-IT",
                "create_app_info_localization:info-1:it-IT"
            ]
        );
    }

    #[tokio::test]
    async fn test_app_info_failure_degrades() {
        let fake = editable_app();
        fake.lock_state(|state| {
            state.failing.insert("create_app_info_localization");
        });
        let mut metadata = AppMetadata::new("com.example.app", "de-DE");
        metadata.subtitle = Some("Zeit".to_string());

        let outcome = service(&fake).upload(&metadata).await;
        assert!(outcome.is_degraded());
        let result = outcome.into_value().unwrap();
        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_no_editable_version_is_fatal() {
        let fake = Arc::new(FakeConnect::with(|state| {
            state.add_app("app-1", "com.example.app", None);
            state.add_version("app-1", "ver-live", "1.0", "READY_FOR_SALE");
        }));
        let mut metadata = AppMetadata::new("com.example.app", "en-US");
        metadata.description = Some("Description".to_string());

        let outcome = service(&fake).upload(&metadata).await;
        assert!(outcome.is_fatal());
        assert!(outcome.reason().unwrap().contains("No editable App Store version"));
    }

    #[tokio::test]
    async fn test_screenshot_upload_flow() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("screenshots").join("APP_IPHONE_65");
        std::fs::create_dir_all(&dir).unwrap();
        let good = dir.join("01-home.png");
        std::fs::write(&good, b"image-bytes").unwrap();
        let loose = temp.path().join("screenshots").join("stray.png");
        std::fs::write(&loose, b"x").unwrap();

        let fake = editable_app();
        let mut metadata = AppMetadata::new("com.example.app", "en-US");
        metadata.screenshots = vec![good, loose];

        let outcome = service(&fake).upload(&metadata).await;
        assert!(outcome.is_degraded());
        let result = outcome.into_value().unwrap();
        assert_eq!(result.uploaded_files, 1);
        assert_eq!(result.errors.len(), 1);

        let checksum = format!("{:x}", md5::compute(b"image-bytes"));
        let writes = fake.writes();
        assert_eq!(writes[0], "create_screenshot_set:APP_IPHONE_65");
        assert!(writes[1].starts_with("reserve_screenshot:set-"));
        assert!(writes[2].ends_with(":11"));
        assert!(writes[3].ends_with(&checksum));
    }

    #[test]
    fn test_display_type_from_cache_layout() {
        let path = Path::new("cache/com.example/1.0/en-US/screenshots/APP_IPAD_PRO_129/01-a.png");
        assert_eq!(display_type_for(path).as_deref(), Some("APP_IPAD_PRO_129"));
        assert_eq!(display_type_for(Path::new("screenshots/a.png")), None);
    }
}
