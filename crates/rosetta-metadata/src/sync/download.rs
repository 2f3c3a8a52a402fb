//! Listing download.

use std::sync::Arc;

use indexmap::IndexMap;
use rosetta_core::Outcome;
use tracing::{info, warn};

use super::{AppStoreService, MOCK_DATA_NOTE, OFFLINE_REASON};
use crate::connect::ConnectBackend;
use crate::screenshots::ScreenshotSynchronizer;
use crate::types::metadata::{DownloadResult, DEFAULT_VERSION, UNKNOWN_APP_NAME};
use crate::types::status::AppStoreState;
use crate::Result;

/// Versions considered when looking for the live listing.
const LIVE_VERSION_LIMIT: usize = 5;

/// Characters of long fields shown in debug output.
const PREVIEW_CHARS: usize = 50;

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// Data gathered from the live store before fill-in.
#[derive(Default)]
struct Collected {
    version: Option<String>,
    localization_ids: IndexMap<String, String>,
    problems: Vec<String>,
}

impl AppStoreService {
    /// Downloads the listing of `bundle_id` and writes it to the local cache.
    ///
    /// Never fails: without credentials, or when the app cannot be found, the
    /// mock listing is returned as a degraded outcome and nothing is cached.
    /// When a later request fails the data gathered so far is kept.
    pub async fn download_app_info(&self, bundle_id: &str) -> Outcome<DownloadResult> {
        self.fetch(bundle_id, true).await
    }

    /// Reads the live listing like [`download_app_info`](Self::download_app_info)
    /// but leaves the cache and screenshots untouched.
    pub async fn fetch_app_info(&self, bundle_id: &str) -> Outcome<DownloadResult> {
        self.fetch(bundle_id, false).await
    }

    async fn fetch(&self, bundle_id: &str, persist: bool) -> Outcome<DownloadResult> {
        info!(bundle_id, persist, "downloading app info");

        let Some(backend) = self.mode.backend() else {
            warn!("no App Store Connect credentials configured, using mock data");
            info!("set ISSUER_ID, KEY_ID and PRIVATE_KEY_PATH in .env to use real data");
            return Outcome::degraded(
                DownloadResult::mock(bundle_id),
                format!("{}; {}", OFFLINE_REASON, MOCK_DATA_NOTE),
            );
        };

        let app = match backend.find_app(bundle_id).await {
            Ok(Some(app)) => app,
            Ok(None) => {
                warn!(bundle_id, "app not found in App Store Connect, falling back to mock data");
                return Outcome::degraded(
                    DownloadResult::mock(bundle_id),
                    format!("App with bundle ID {} not found; {}", bundle_id, MOCK_DATA_NOTE),
                );
            }
            Err(e) => {
                warn!(bundle_id, error = %e, "App Store Connect request failed, falling back to mock data");
                return Outcome::degraded(
                    DownloadResult::mock(bundle_id),
                    format!("App Store Connect request failed: {}; {}", e, MOCK_DATA_NOTE),
                );
            }
        };

        let app_name = app
            .attributes
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_APP_NAME.to_string());
        info!(app = %app_name, id = %app.id, "found app");

        let mut result = DownloadResult::new(bundle_id);
        result.default_locale = Some(self.default_locale.clone());

        let mut collected = Collected::default();
        if let Err(e) = self
            .collect_listing(backend.as_ref(), &app.id, &app_name, &mut result, &mut collected)
            .await
        {
            warn!(error = %e, "failed to fetch App Store data");
            collected.problems.push(e.to_string());

            if result.is_empty() {
                let entry = result.locale_mut("en-US");
                entry.name = app_name.clone();
                entry.description = format!("Real app data retrieval failed for {}", app_name);
            }
        } else {
            result.app_version = Some(
                collected
                    .version
                    .clone()
                    .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            );
        }

        if result.is_empty() {
            info!("no localizations found, creating default English entry");
        }
        result.fill_missing(&app_name);
        info!(count = result.locales.len(), locales = %result.locales.join(", "), "retrieved localizations");

        if persist {
            self.download_screenshots(backend, &result, &collected.localization_ids)
                .await;
            self.cache.save(&result).await;
        }

        if collected.problems.is_empty() {
            Outcome::Ok(result)
        } else {
            Outcome::degraded(result, collected.problems.join("; "))
        }
    }

    /// App info localizations, then the latest live version and its
    /// localizations. Errors abort; a failed version localization fetch is
    /// recorded in `collected.problems` instead.
    async fn collect_listing(
        &self,
        backend: &dyn ConnectBackend,
        app_id: &str,
        app_name: &str,
        result: &mut DownloadResult,
        collected: &mut Collected,
    ) -> Result<()> {
        let infos = backend.app_infos(app_id).await?;
        match infos.first() {
            Some(info) => {
                let localizations = backend.app_info_localizations(&info.id).await?;
                if localizations.is_empty() {
                    warn!("no app info localizations found");
                }
                for localization in localizations {
                    let Some(locale) = localization.attributes.locale.filter(|l| !l.is_empty())
                    else {
                        continue;
                    };
                    let entry = result.locale_mut(&locale);
                    entry.name = localization
                        .attributes
                        .name
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| app_name.to_string());
                    entry.subtitle = localization.attributes.subtitle.unwrap_or_default();
                    info!(locale = %locale, name = %entry.name, "loaded app info");
                }
            }
            None => warn!("no app info found"),
        }

        let versions = backend
            .app_store_versions(app_id, &AppStoreState::LIVE, LIVE_VERSION_LIMIT)
            .await?;
        let Some(latest) = versions.first() else {
            warn!("no App Store versions found in expected states");
            return Ok(());
        };

        let version = latest
            .attributes
            .version_string
            .clone()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());
        info!(version = %version, id = %latest.id, "found App Store version");
        collected.version = Some(version);

        match backend.version_localizations(&latest.id).await {
            Ok(localizations) => {
                if localizations.is_empty() {
                    warn!("no App Store version localizations found");
                }
                for localization in localizations {
                    let attributes = localization.attributes;
                    let Some(locale) = attributes.locale.filter(|l| !l.is_empty()) else {
                        continue;
                    };
                    let entry = result.locale_mut(&locale);
                    entry.description = attributes.description.unwrap_or_default();
                    entry.keywords = attributes.keywords.unwrap_or_default();
                    entry.whats_new = attributes.whats_new.unwrap_or_default();
                    collected
                        .localization_ids
                        .insert(locale.clone(), localization.id);

                    info!(locale = %locale, "loaded version data");
                    if self.debug {
                        info!(
                            locale = %locale,
                            description = %preview(&entry.description),
                            keywords = %entry.keywords,
                            whats_new = %preview(&entry.whats_new),
                            "version localization"
                        );
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch version localizations");
                collected
                    .problems
                    .push(format!("version localizations: {}", e));
            }
        }

        Ok(())
    }

    async fn download_screenshots(
        &self,
        backend: &Arc<dyn ConnectBackend>,
        result: &DownloadResult,
        localization_ids: &IndexMap<String, String>,
    ) {
        if localization_ids.is_empty() {
            info!("no version localization ids found, skipping screenshot download");
            return;
        }

        let synchronizer = match ScreenshotSynchronizer::new(backend.clone(), self.cache.clone()) {
            Ok(synchronizer) => synchronizer,
            Err(e) => {
                warn!(error = %e, "failed to download screenshots");
                return;
            }
        };

        info!("downloading screenshots for locales");
        let stats = synchronizer
            .download_screenshots_for_locales(&result.app_id, result.version(), localization_ids)
            .await;
        info!(
            total = stats.total,
            ok = stats.succeeded,
            failed = stats.failed,
            "screenshot download completed"
        );
    }
}
