//! Screenshot download.
//!
//! Screenshots are stored under the locale directory of the cache as
//! `screenshots/<displayType>/<NN>-<fileName>`, where `NN` is the 1-based
//! position within the set. A `screenshots.json` manifest next to them
//! records what was fetched from where.

use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use indexmap::IndexMap;
use regex::Regex;
use reqwest::{redirect, Client};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

use crate::cache::{LocalCache, SCREENSHOTS_DIR_NAME};
use crate::connect::resources::{ScreenshotAttributes, ScreenshotResource};
use crate::connect::ConnectBackend;
use crate::types::screenshots::{
    ManifestItem, ManifestSet, ScreenshotManifest, ScreenshotStats, MANIFEST_FILE_NAME,
    UNKNOWN_DISPLAY_TYPE,
};
use crate::utils::relative_slash_path;
use crate::{MetadataError, Result};

const DEFAULT_WIDTH: u32 = 1242;
const DEFAULT_HEIGHT: u32 = 2688;
const DEFAULT_FORMAT: &str = "png";
const MAX_REDIRECTS: usize = 10;

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn non_zero(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v > 0)
}

/// Picks a downloadable URL for a screenshot.
///
/// Order: `imageAsset.url`, then `sourceFileUrl`, then `imageAsset.templateUrl`
/// with `{w}`, `{h}` and `{f}` filled in. A template without placeholders is
/// used as is.
pub fn resolve_image_url(attributes: &ScreenshotAttributes) -> Option<String> {
    let asset = attributes.image_asset.clone().unwrap_or_default();

    if let Some(url) = non_empty(&asset.url).or_else(|| non_empty(&attributes.source_file_url)) {
        return Some(url.to_string());
    }

    let template = non_empty(&asset.template_url)?;
    if !["{w}", "{h}", "{f}"].iter().any(|p| template.contains(p)) {
        return Some(template.to_string());
    }

    let width = non_zero(asset.width)
        .or(non_zero(attributes.width))
        .unwrap_or(DEFAULT_WIDTH);
    let height = non_zero(asset.height)
        .or(non_zero(attributes.height))
        .unwrap_or(DEFAULT_HEIGHT);
    let format = non_empty(&asset.file_type)
        .or_else(|| non_empty(&asset.format))
        .unwrap_or(DEFAULT_FORMAT)
        .to_lowercase();

    Some(
        template
            .replace("{w}", &width.to_string())
            .replace("{h}", &height.to_string())
            .replace("{f}", &format),
    )
}

/// Replaces every run of characters outside `[A-Za-z0-9._-]` with `_`.
///
/// A result made only of dots (`.` or `..`) becomes `_`, so the value is
/// always safe as a single path component.
pub fn sanitize_file_name(name: &str) -> String {
    static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE_CHARS.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex"));

    let sanitized = re.replace_all(name, "_");
    if !sanitized.is_empty() && sanitized.chars().all(|c| c == '.') {
        return "_".to_string();
    }
    sanitized.into_owned()
}

/// Sanitized base name of a screenshot: its `fileName`, else `<id>.png`.
fn base_name(shot: &ScreenshotResource) -> String {
    match non_empty(&shot.attributes.file_name) {
        Some(name) => sanitize_file_name(name),
        None if !shot.id.is_empty() => sanitize_file_name(&format!("{}.png", shot.id)),
        None => "screenshot.png".to_string(),
    }
}

/// Downloads screenshots listed by App Store Connect into the local cache.
pub struct ScreenshotSynchronizer {
    backend: Arc<dyn ConnectBackend>,
    cache: LocalCache,
    http: Client,
}

impl ScreenshotSynchronizer {
    pub fn new(backend: Arc<dyn ConnectBackend>, cache: LocalCache) -> Result<Self> {
        let http = Client::builder()
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MetadataError::SyncError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            backend,
            cache,
            http,
        })
    }

    /// Streams `url` into `dest`, creating parent directories.
    ///
    /// A partially written file is removed when the transfer fails.
    pub async fn download_file(&self, url: &str, dest: &Path) -> Result<u64> {
        let mut response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::Download {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = fs::File::create(dest).await?;

        let written = async {
            let mut total = 0u64;
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk).await?;
                total += chunk.len() as u64;
            }
            file.flush().await?;
            Ok::<u64, MetadataError>(total)
        }
        .await;

        if written.is_err() {
            drop(file);
            if let Err(e) = fs::remove_file(dest).await {
                warn!(path = %dest.display(), error = %e, "failed to remove partial download");
            }
        }

        written
    }

    /// Downloads every screenshot of one version localization.
    ///
    /// Individual download failures are counted, not returned. Listing
    /// failures abort the locale.
    pub async fn download_screenshots_for_locale(
        &self,
        version_localization_id: &str,
        locale: &str,
        bundle_id: &str,
        version: &str,
    ) -> Result<ScreenshotStats> {
        let locale_dir = self.cache.locale_dir(bundle_id, version, locale);
        let screenshots_dir = locale_dir.join(SCREENSHOTS_DIR_NAME);
        fs::create_dir_all(&screenshots_dir).await?;

        let mut stats = ScreenshotStats::default();
        let mut manifest = ScreenshotManifest::new(locale);

        info!(locale, "listing screenshot sets");
        let sets = self.backend.screenshot_sets(version_localization_id).await?;

        for set in sets {
            let display_type = set
                .attributes
                .screenshot_display_type
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(sanitize_file_name)
                .unwrap_or_else(|| UNKNOWN_DISPLAY_TYPE.to_string());
            let set_dir = screenshots_dir.join(&display_type);
            fs::create_dir_all(&set_dir).await?;

            info!(locale, display_type = %display_type, set_id = %set.id, "fetching screenshots for set");
            let shots = self.backend.screenshots(&set.id).await?;
            let count = shots.len();

            let mut items = Vec::new();
            for (index, shot) in shots.iter().enumerate() {
                let position = index + 1;
                let name = base_name(shot);
                let dest = set_dir.join(format!("{:02}-{}", position, name));

                let Some(url) = resolve_image_url(&shot.attributes) else {
                    error!(locale, file = %name, "failed to download screenshot: missing image URL");
                    stats.record_failure();
                    continue;
                };

                info!(locale, display_type = %display_type, position, count, file = %name, "downloading screenshot");
                match self.download_file(&url, &dest).await {
                    Ok(_) => {
                        stats.record_success(&display_type);
                        items.push(ManifestItem {
                            id: shot.id.clone(),
                            file: relative_slash_path(&locale_dir, &dest),
                            url,
                        });
                    }
                    Err(e) => {
                        error!(locale, file = %name, error = %e, "failed to download screenshot");
                        stats.record_failure();
                    }
                }
            }

            manifest.sets.push(ManifestSet {
                set_id: set.id.clone(),
                display_type,
                items,
            });
        }

        if let Err(e) = write_manifest(&locale_dir, &manifest).await {
            warn!(locale, error = %e, "failed to write screenshots.json");
        }

        info!(
            locale,
            total = stats.total,
            ok = stats.succeeded,
            failed = stats.failed,
            "screenshots processed"
        );
        Ok(stats)
    }

    /// Downloads screenshots for each `(locale, version localization id)`
    /// pair in order. A failing locale is logged and skipped.
    pub async fn download_screenshots_for_locales(
        &self,
        bundle_id: &str,
        version: &str,
        localization_ids: &IndexMap<String, String>,
    ) -> ScreenshotStats {
        let mut totals = ScreenshotStats::default();

        for (locale, localization_id) in localization_ids {
            match self
                .download_screenshots_for_locale(localization_id, locale, bundle_id, version)
                .await
            {
                Ok(stats) => totals.merge(&stats),
                Err(e) => warn!(locale = %locale, error = %e, "screenshot download failed"),
            }
        }

        totals
    }
}

async fn write_manifest(locale_dir: &Path, manifest: &ScreenshotManifest) -> Result<()> {
    let content = serde_json::to_string_pretty(manifest)?;
    fs::write(locale_dir.join(MANIFEST_FILE_NAME), content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect::fake::FakeConnect;
    use crate::connect::resources::{ImageAsset, Resource, ScreenshotSetAttributes};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn asset(url: Option<&str>, template: Option<&str>) -> ScreenshotAttributes {
        ScreenshotAttributes {
            image_asset: Some(ImageAsset {
                url: url.map(str::to_string),
                template_url: template.map(str::to_string),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_direct_url_wins() {
        let mut attrs = asset(Some("https://a/direct.png"), Some("https://a/{w}x{h}.{f}"));
        attrs.source_file_url = Some("https://a/source.png".to_string());
        assert_eq!(resolve_image_url(&attrs).as_deref(), Some("https://a/direct.png"));

        let mut attrs = asset(None, Some("https://a/{w}x{h}.{f}"));
        attrs.source_file_url = Some("https://a/source.png".to_string());
        assert_eq!(resolve_image_url(&attrs).as_deref(), Some("https://a/source.png"));
    }

    #[test]
    fn test_template_defaults() {
        let attrs = asset(None, Some("https://a/{w}x{h}bb.{f}"));
        assert_eq!(
            resolve_image_url(&attrs).as_deref(),
            Some("https://a/1242x2688bb.png")
        );
    }

    #[test]
    fn test_template_uses_asset_dimensions_and_format() {
        let mut attrs = asset(None, Some("https://a/{w}x{h}.{f}"));
        if let Some(asset) = attrs.image_asset.as_mut() {
            asset.width = Some(1290);
            asset.file_type = Some("JPEG".to_string());
        }
        attrs.height = Some(2796);
        assert_eq!(
            resolve_image_url(&attrs).as_deref(),
            Some("https://a/1290x2796.jpeg")
        );
    }

    #[test]
    fn test_template_without_placeholders_is_kept() {
        let attrs = asset(None, Some("https://a/fixed.png"));
        assert_eq!(resolve_image_url(&attrs).as_deref(), Some("https://a/fixed.png"));
    }

    #[test]
    fn test_no_url() {
        assert_eq!(resolve_image_url(&ScreenshotAttributes::default()), None);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Home Screen (1).png"), "Home_Screen_1_.png");
        assert_eq!(sanitize_file_name("a//b??c.png"), "a_b_c.png");
        assert_eq!(sanitize_file_name("ok-name_1.png"), "ok-name_1.png");

        assert_eq!(sanitize_file_name(".."), "_");
        assert_eq!(sanitize_file_name("../../etc"), ".._.._etc");

        let once = sanitize_file_name("Écran d'accueil.png");
        assert_eq!(sanitize_file_name(&once), once);
    }

    fn shot(id: &str, file_name: Option<&str>, url: Option<String>) -> ScreenshotResource {
        Resource::new(
            id,
            ScreenshotAttributes {
                file_name: file_name.map(str::to_string),
                image_asset: Some(ImageAsset {
                    url,
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_download_for_locale() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/home.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNGDATA".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/moved.png"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/home.png", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let uri = server.uri();
        let backend = FakeConnect::with(|state| {
            state.screenshot_sets.insert(
                "vloc-1".to_string(),
                vec![
                    Resource::new(
                        "set-1",
                        ScreenshotSetAttributes {
                            screenshot_display_type: Some("APP_IPHONE_65".to_string()),
                        },
                    ),
                    Resource::new("set-2", ScreenshotSetAttributes::default()),
                ],
            );
            state.screenshots.insert(
                "set-1".to_string(),
                vec![
                    shot("s1", Some("Home Screen.png"), Some(format!("{uri}/home.png"))),
                    shot("s2", None, Some(format!("{uri}/moved.png"))),
                    shot("s3", Some("gone.png"), Some(format!("{uri}/gone.png"))),
                ],
            );
            state
                .screenshots
                .insert("set-2".to_string(), vec![shot("s4", Some("x.png"), None)]);
        });

        let temp = TempDir::new().unwrap();
        let cache = LocalCache::new(temp.path());
        let sync = ScreenshotSynchronizer::new(Arc::new(backend), cache).unwrap();

        let stats = sync
            .download_screenshots_for_locale("vloc-1", "en-US", "com.example.app", "1.0")
            .await
            .unwrap();

        assert_eq!(stats.total, 4);
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.by_display_type["APP_IPHONE_65"], 2);

        let locale_dir = temp.path().join("com.example.app/1.0/en-US");
        let set_dir = locale_dir.join("screenshots/APP_IPHONE_65");
        assert_eq!(std::fs::read(set_dir.join("01-Home_Screen.png")).unwrap(), b"PNGDATA");
        assert!(set_dir.join("02-s2.png").exists());
        assert!(!set_dir.join("03-gone.png").exists());
        assert!(locale_dir.join("screenshots/UNKNOWN").is_dir());

        let manifest: ScreenshotManifest = serde_json::from_str(
            &std::fs::read_to_string(locale_dir.join("screenshots.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest.locale, "en-US");
        assert_eq!(manifest.sets.len(), 2);
        assert_eq!(
            manifest.sets[0].items[0].file,
            "screenshots/APP_IPHONE_65/01-Home_Screen.png"
        );
        assert_eq!(manifest.sets[1].display_type, "UNKNOWN");
        assert!(manifest.sets[1].items.is_empty());
    }

    #[tokio::test]
    async fn test_display_type_stays_inside_screenshots_dir() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"A".to_vec()))
            .mount(&server)
            .await;

        let uri = server.uri();
        let backend = FakeConnect::with(|state| {
            state.screenshot_sets.insert(
                "vloc-1".to_string(),
                vec![Resource::new(
                    "set-1",
                    ScreenshotSetAttributes {
                        screenshot_display_type: Some("../../escape".to_string()),
                    },
                )],
            );
            state.screenshots.insert(
                "set-1".to_string(),
                vec![shot("s1", Some("a.png"), Some(format!("{uri}/a.png")))],
            );
        });

        let temp = TempDir::new().unwrap();
        let sync =
            ScreenshotSynchronizer::new(Arc::new(backend), LocalCache::new(temp.path())).unwrap();
        let stats = sync
            .download_screenshots_for_locale("vloc-1", "en-US", "com.example.app", "1.0")
            .await
            .unwrap();

        assert_eq!(stats.succeeded, 1);
        let screenshots = temp.path().join("com.example.app/1.0/en-US/screenshots");
        assert!(screenshots.join(".._.._escape/01-a.png").exists());
        assert!(!temp.path().join("com.example.app/1.0/escape").exists());
    }

    #[tokio::test]
    async fn test_failing_locale_is_skipped() {
        let backend = FakeConnect::with(|state| {
            state.failing.insert("screenshot_sets");
        });

        let temp = TempDir::new().unwrap();
        let sync =
            ScreenshotSynchronizer::new(Arc::new(backend), LocalCache::new(temp.path())).unwrap();

        let mut ids = IndexMap::new();
        ids.insert("en-US".to_string(), "vloc-1".to_string());
        let stats = sync
            .download_screenshots_for_locales("com.example.app", "1.0", &ids)
            .await;

        assert_eq!(stats, ScreenshotStats::default());
    }
}
