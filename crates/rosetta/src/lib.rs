//! Rosetta - App Store Connect localization toolkit
//!
//! [`Rosetta`] is the explicit context every operation runs through. It is
//! built once from resolved [`Settings`] and decides up front whether App
//! Store Connect and the translation model are live or offline:
//!
//! ```no_run
//! use rosetta::Rosetta;
//! use rosetta_core::Settings;
//!
//! # async fn example() {
//! let cwd = std::env::current_dir().unwrap();
//! let rosetta = Rosetta::initialize(Settings::load(&cwd));
//! let outcome = rosetta.download("com.example.app").await;
//! println!("degraded: {}", outcome.is_degraded());
//! # }
//! ```

pub mod error;
pub mod review;
pub mod workspace;

use rosetta_core::{Outcome, Settings};
use rosetta_metadata::{
    validate_content, AppMetadata, AppStoreConnectClient, AppStoreService, ConnectMode,
    ContentInput, ContentValidation, DownloadResult, LocalCache, LocaleMetadata, UploadResult,
    VersionStatus,
};
use rosetta_translate::{
    BatchTranslationRequest, BatchTranslationResult, CostEstimate, OpenAiClient, TranslateMode,
    Translator,
};
use rosetta_metadata::cache::AppSummary;
use rosetta_metadata::sync::MOCK_DATA_NOTE;
use serde::Serialize;
use tracing::{info, warn};

pub use error::{Result, RosettaError};
pub use review::{LocaleDiff, LocalePreview};

/// Shared state for one run of the toolkit.
#[derive(Debug, Clone)]
pub struct Rosetta {
    settings: Settings,
    store: AppStoreService,
    translator: Translator,
}

/// Outcome of translating a cached listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedTranslation {
    pub version: String,
    pub source_locale: String,
    /// Locales written to the cache, in target order.
    pub written: Vec<String>,
    pub result: BatchTranslationResult,
}

/// A cached source locale ready to be translated.
#[derive(Debug, Clone)]
pub struct CachedSource {
    pub version: String,
    pub source_locale: String,
    pub request: BatchTranslationRequest,
}

/// One upload performed by [`Rosetta::push_cached`].
#[derive(Debug, Clone)]
pub struct PushReport {
    pub locale: String,
    /// `metadata` or `screenshots`.
    pub kind: &'static str,
    pub outcome: Outcome<UploadResult>,
}

impl Rosetta {
    /// Builds the context, choosing live or offline backends from settings.
    ///
    /// A client that cannot be constructed (for example an unreadable key)
    /// is logged and replaced by the offline backend.
    pub fn initialize(settings: Settings) -> Self {
        let connect = match &settings.connect {
            Some(credentials) => {
                let client = match &settings.connect_base_url {
                    Some(url) => AppStoreConnectClient::with_base_url(credentials, url.as_str()),
                    None => AppStoreConnectClient::new(credentials),
                };
                match client {
                    Ok(client) => ConnectMode::live(client),
                    Err(e) => {
                        warn!(error = %e, "could not create App Store Connect client, running in offline mode");
                        ConnectMode::Offline
                    }
                }
            }
            None => ConnectMode::Offline,
        };

        let translate = match &settings.openai_api_key {
            Some(key) => match OpenAiClient::new(key.as_str(), settings.openai_base_url.as_deref()) {
                Ok(client) => TranslateMode::live(client),
                Err(e) => {
                    warn!(error = %e, "could not create OpenAI client, using mock translations");
                    TranslateMode::Mock
                }
            },
            None => TranslateMode::Mock,
        };

        Self::with_modes(settings, connect, translate)
    }

    /// Builds the context around explicit backends.
    pub fn with_modes(settings: Settings, connect: ConnectMode, translate: TranslateMode) -> Self {
        let cache = LocalCache::new(&settings.cache_root).with_debug(settings.debug);
        let store = AppStoreService::new(connect, cache, settings.default_locale())
            .with_debug(settings.debug);
        let translator = Translator::new(translate, &settings.project.ai);

        info!(
            connect_live = store.mode().is_live(),
            translate_live = translator.is_live(),
            cache_root = %settings.cache_root.display(),
            "rosetta initialized"
        );

        Self {
            settings,
            store,
            translator,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// App Store Connect workflows.
    pub fn connect(&self) -> &AppStoreService {
        &self.store
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn cache(&self) -> &LocalCache {
        self.store.cache()
    }

    /// Bundle id from `rosetta.toml`, unless overridden.
    pub fn bundle_id<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit.or(self.settings.project.app.bundle_id.as_deref())
    }

    pub async fn upload(&self, metadata: &AppMetadata) -> Outcome<UploadResult> {
        self.store.upload(metadata).await
    }

    pub async fn download(&self, bundle_id: &str) -> Outcome<DownloadResult> {
        self.store.download_app_info(bundle_id).await
    }

    pub fn validate(&self, content: &ContentInput) -> ContentValidation {
        validate_content(content)
    }

    pub async fn version_status(&self, bundle_id: &str) -> Outcome<VersionStatus> {
        self.store.version_status(bundle_id).await
    }

    pub async fn translate(&self, request: &BatchTranslationRequest) -> Outcome<BatchTranslationResult> {
        self.translator.translate_metadata(request).await
    }

    pub fn estimate_cost(&self, request: &BatchTranslationRequest) -> CostEstimate {
        self.translator.estimate_cost(request)
    }

    /// Loads the default locale of the cached listing as a batch request.
    ///
    /// The source locale is the one recorded at pull time, else the
    /// configured default.
    pub async fn cached_source(&self, bundle_id: &str, targets: Vec<String>) -> Result<CachedSource> {
        let summary = self.summary(bundle_id).await?;

        let source_locale = summary
            .default_locale
            .clone()
            .unwrap_or_else(|| self.settings.default_locale().to_string());
        let source = self
            .cache()
            .load_locale(bundle_id, &summary.current_version, &source_locale)
            .await?;

        Ok(CachedSource {
            request: workspace::batch_request(&source, &source_locale, targets),
            version: summary.current_version,
            source_locale,
        })
    }

    /// Translates the cached source locale and writes each target locale
    /// next to it in the cache.
    ///
    /// Mock translations are only written when `write_mock` is set, so a
    /// later push never uploads placeholder text by accident.
    pub async fn translate_cached(
        &self,
        bundle_id: &str,
        targets: Vec<String>,
        write_mock: bool,
    ) -> Result<Outcome<CachedTranslation>> {
        let source = self.cached_source(bundle_id, targets).await?;
        let outcome = self.translate(&source.request).await;
        if let Outcome::Fatal(reason) = outcome {
            return Ok(Outcome::Fatal(reason));
        }

        let mut written = Vec::new();
        let persist = self.translator.is_live() || write_mock;
        if !persist {
            warn!(bundle_id, "mock translations not written to the cache");
        }
        if let Some(result) = outcome.value().filter(|_| persist) {
            for locale in source.request.foreign_targets() {
                let Some(fields) = result.translations.get(locale) else {
                    continue;
                };
                let metadata = workspace::locale_from_fields(fields)?;
                self.cache()
                    .write_locale(bundle_id, &source.version, locale, &metadata)
                    .await?;
                written.push(locale.clone());
            }
        }
        if !written.is_empty() {
            self.cache().register_locales(bundle_id, &written).await?;
        }
        info!(bundle_id, locales = written.len(), "translations cached");

        Ok(outcome.map(|result| CachedTranslation {
            version: source.version,
            source_locale: source.source_locale,
            written,
            result,
        }))
    }

    /// Validates every cached locale.
    pub async fn validate_cached(&self, bundle_id: &str) -> Result<Vec<(String, ContentValidation)>> {
        let (version, locales) = self.cached_locales(bundle_id).await?;
        let mut results = Vec::with_capacity(locales.len());
        for locale in locales {
            let metadata = self.cache().load_locale(bundle_id, &version, &locale).await?;
            let validation = self.validate(&ContentInput::from(&metadata));
            results.push((locale, validation));
        }
        Ok(results)
    }

    /// Uploads cached locales. An empty `locales` pushes every cached one.
    ///
    /// Each locale's text goes up first; its screenshots follow as a second
    /// upload when `with_screenshots` is set and any are cached.
    pub async fn push_cached(
        &self,
        bundle_id: &str,
        locales: &[String],
        with_screenshots: bool,
    ) -> Result<Vec<PushReport>> {
        let (version, cached) = self.cached_locales(bundle_id).await?;
        let selected: Vec<String> = if locales.is_empty() {
            cached
        } else {
            locales.to_vec()
        };

        let mut reports = Vec::new();
        for locale in selected {
            let fields: LocaleMetadata = self.cache().load_locale(bundle_id, &version, &locale).await?;
            let mut metadata = AppMetadata::from_locale(bundle_id, locale.as_str(), &fields);
            reports.push(PushReport {
                locale: locale.clone(),
                kind: "metadata",
                outcome: self.upload(&metadata).await,
            });

            if !with_screenshots {
                continue;
            }
            let dir = self.cache().locale_dir(bundle_id, &version, &locale);
            metadata.screenshots = workspace::cached_screenshots(&dir).await?;
            if metadata.has_screenshots() {
                reports.push(PushReport {
                    locale,
                    kind: "screenshots",
                    outcome: self.upload(&metadata).await,
                });
            }
        }
        Ok(reports)
    }

    /// Shows one cached locale with its field usage. `locale` defaults to
    /// the cached default locale.
    pub async fn preview_cached(&self, bundle_id: &str, locale: Option<&str>) -> Result<LocalePreview> {
        let summary = self.summary(bundle_id).await?;
        let locale = match locale {
            Some(locale) => locale.to_string(),
            None => summary
                .default_locale
                .clone()
                .unwrap_or_else(|| self.settings.default_locale().to_string()),
        };

        let metadata = self
            .cache()
            .load_locale(bundle_id, &summary.current_version, &locale)
            .await?;
        let dir = self.cache().locale_dir(bundle_id, &summary.current_version, &locale);
        let screenshots = workspace::cached_screenshots(&dir).await?.len();

        Ok(LocalePreview {
            usage: review::field_usage(&metadata),
            version: summary.current_version,
            locale,
            metadata,
            screenshots,
        })
    }

    /// Compares cached locales with the live listing. An empty `locales`
    /// compares every cached one.
    ///
    /// Mock data is never compared against: without a live listing the
    /// outcome is fatal.
    pub async fn diff_cached(
        &self,
        bundle_id: &str,
        locales: &[String],
    ) -> Result<Outcome<Vec<LocaleDiff>>> {
        let (version, cached) = self.cached_locales(bundle_id).await?;
        let selected = if locales.is_empty() {
            cached
        } else {
            locales.to_vec()
        };

        let remote = match self.store.fetch_app_info(bundle_id).await {
            Outcome::Fatal(reason) => return Ok(Outcome::Fatal(reason)),
            Outcome::Degraded { reason, .. } if reason.ends_with(MOCK_DATA_NOTE) => {
                return Ok(Outcome::fatal(format!("Live listing unavailable: {}", reason)))
            }
            remote => remote,
        };

        let mut diffs = Vec::with_capacity(selected.len());
        for locale in &selected {
            let local = self.cache().load_locale(bundle_id, &version, locale).await?;
            let live = remote.value().and_then(|result| result.get(locale));
            diffs.push(review::diff_locale(locale, &local, live));
        }
        info!(bundle_id, locales = diffs.len(), "compared cached listing with App Store Connect");

        Ok(remote.map(|_| diffs))
    }

    async fn summary(&self, bundle_id: &str) -> Result<AppSummary> {
        match self.cache().load_summary(bundle_id).await {
            Ok(summary) => Ok(summary),
            Err(rosetta_metadata::MetadataError::NotFound(_)) => {
                Err(RosettaError::NotCached(bundle_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn cached_locales(&self, bundle_id: &str) -> Result<(String, Vec<String>)> {
        let summary = self.summary(bundle_id).await?;
        Ok((summary.current_version, summary.available_locales))
    }
}
