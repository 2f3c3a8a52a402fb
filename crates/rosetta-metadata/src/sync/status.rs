//! Version status lookup.

use rosetta_core::Outcome;
use tracing::{info, warn};

use super::{AppStoreService, OFFLINE_REASON};
use crate::connect::resources::VersionResource;
use crate::connect::ConnectBackend;
use crate::types::metadata::UNKNOWN_APP_NAME;
use crate::types::status::{VersionInfo, VersionStatus};
use crate::utils::now_timestamp;
use crate::{MetadataError, Result};

/// Number of most recent versions reported.
const STATUS_VERSION_LIMIT: usize = 10;

const UNKNOWN: &str = "Unknown";

impl From<VersionResource> for VersionInfo {
    fn from(version: VersionResource) -> Self {
        let attributes = version.attributes;
        Self {
            id: version.id,
            version_string: attributes
                .version_string
                .unwrap_or_else(|| UNKNOWN.to_string()),
            app_store_state: attributes
                .app_store_state
                .unwrap_or_else(|| UNKNOWN.to_string()),
            created_date: attributes.created_date,
            downloadable: attributes.downloadable.unwrap_or(false),
            release_type: attributes.release_type,
        }
    }
}

impl AppStoreService {
    /// Reports the most recent versions of an app.
    ///
    /// Unlike downloads there is no mock fallback: offline or on any
    /// failure the outcome is fatal.
    pub async fn version_status(&self, bundle_id: &str) -> Outcome<VersionStatus> {
        info!(bundle_id, "getting version status");

        let Some(backend) = self.mode.backend() else {
            return Outcome::fatal(OFFLINE_REASON);
        };

        match fetch_status(backend.as_ref(), bundle_id).await {
            Ok(status) => {
                info!(
                    versions = status.total_versions,
                    current = %status.current_version.version_string,
                    state = %status.current_version.app_store_state,
                    "version status retrieved"
                );
                Outcome::Ok(status)
            }
            Err(e) => {
                warn!(error = %e, "failed to get version status");
                Outcome::fatal(e.to_string())
            }
        }
    }
}

async fn fetch_status(backend: &dyn ConnectBackend, bundle_id: &str) -> Result<VersionStatus> {
    let app = backend
        .find_app(bundle_id)
        .await?
        .ok_or_else(|| MetadataError::NotFound(format!("App with bundle ID {} not found", bundle_id)))?;
    let app_name = app
        .attributes
        .name
        .unwrap_or_else(|| UNKNOWN_APP_NAME.to_string());

    let versions: Vec<VersionInfo> = backend
        .app_store_versions(&app.id, &[], STATUS_VERSION_LIMIT)
        .await?
        .into_iter()
        .map(VersionInfo::from)
        .collect();

    let current_version = versions
        .first()
        .cloned()
        .ok_or_else(|| MetadataError::NotFound(format!("No versions found for app {}", bundle_id)))?;

    Ok(VersionStatus {
        app_id: bundle_id.to_string(),
        app_name,
        bundle_id: bundle_id.to_string(),
        current_version,
        total_versions: versions.len(),
        all_versions: versions,
        last_updated: now_timestamp(),
    })
}
