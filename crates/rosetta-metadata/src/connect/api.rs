//! Live App Store Connect client.

use std::sync::Mutex;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, Method, StatusCode};
use rosetta_core::ConnectCredentials;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::resources::*;
use super::ConnectBackend;
use crate::{MetadataError, Result};

/// Base URL for App Store Connect API v1.
pub const DEFAULT_API_BASE_URL: &str = "https://api.appstoreconnect.apple.com/v1";

/// Default retry delay in seconds.
const RETRY_DELAY_SECS: u64 = 1;

/// Maximum number of retries for rate-limited requests.
const MAX_RETRIES: u32 = 3;

/// Largest page size the API accepts.
const PAGE_LIMIT: usize = 200;

/// Hard stop for `links.next` chains.
const MAX_PAGES: usize = 50;

/// Token lifetime; App Store Connect rejects anything over 20 minutes.
const TOKEN_LIFETIME_MINUTES: i64 = 20;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Authenticated App Store Connect API client.
pub struct AppStoreConnectClient {
    issuer_id: String,
    key_id: String,
    encoding_key: EncodingKey,
    base_url: String,
    client: Client,
    jwt_cache: Mutex<Option<JwtCache>>,
}

/// Cached JWT token with expiration.
struct JwtCache {
    token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct JwtClaims {
    iss: String,
    iat: i64,
    exp: i64,
    aud: String,
}

impl AppStoreConnectClient {
    /// Creates a client for the public API.
    ///
    /// Fails when the private key is not a valid EC key in PEM form.
    pub fn new(credentials: &ConnectCredentials) -> Result<Self> {
        Self::with_base_url(credentials, DEFAULT_API_BASE_URL)
    }

    /// Creates a client against another base URL (a proxy or a test server).
    pub fn with_base_url(credentials: &ConnectCredentials, base_url: impl Into<String>) -> Result<Self> {
        let encoding_key = EncodingKey::from_ec_pem(credentials.private_key.as_bytes())
            .map_err(|e| MetadataError::Auth(format!("Invalid API key: {}", e)))?;

        let client = Client::builder()
            .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| MetadataError::SyncError(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, key_id = %credentials.key_id, "App Store Connect client ready");

        Ok(Self {
            issuer_id: credentials.issuer_id.clone(),
            key_id: credentials.key_id.clone(),
            encoding_key,
            base_url,
            client,
            jwt_cache: Mutex::new(None),
        })
    }

    /// Returns a bearer token, reusing the cached one while it has more
    /// than five minutes left.
    fn generate_jwt(&self) -> Result<String> {
        let mut cache = self.jwt_cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ref cached) = *cache {
            if Utc::now() < cached.expires_at - Duration::minutes(5) {
                return Ok(cached.token.clone());
            }
        }

        let now = Utc::now();
        let exp = now + Duration::minutes(TOKEN_LIFETIME_MINUTES);

        let claims = JwtClaims {
            iss: self.issuer_id.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            aud: "appstoreconnect-v1".to_string(),
        };

        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.key_id.clone());

        let token = encode(&header, &claims, &self.encoding_key)?;
        debug!("generated new App Store Connect token");

        *cache = Some(JwtCache {
            token: token.clone(),
            expires_at: exp,
        });

        Ok(token)
    }

    /// Absolute URL for an endpoint; pagination links are already absolute.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}{}", self.base_url, endpoint)
        }
    }

    /// Make an authenticated API request with retry logic.
    async fn api_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let url = self.url(endpoint);
        let mut retries = 0;

        loop {
            let token = self.generate_jwt()?;
            debug!(%method, %url, "API request");

            let mut request = self
                .client
                .request(method.clone(), &url)
                .bearer_auth(token)
                .header("Content-Type", "application/json");

            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if retries >= MAX_RETRIES {
                    return Err(MetadataError::Api {
                        status: status.as_u16(),
                        message: "Rate limited: too many requests".to_string(),
                    });
                }

                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(RETRY_DELAY_SECS);

                warn!(
                    retry_after,
                    attempt = retries + 1,
                    max = MAX_RETRIES,
                    "rate limited, waiting before retry"
                );

                sleep(StdDuration::from_secs(retry_after)).await;
                retries += 1;
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(MetadataError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            return Ok(response);
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.api_request(Method::GET, endpoint, None).await?;
        Ok(response.json().await?)
    }

    /// Fetches every page of a collection, stopping early once `cap` items
    /// have been collected or after [`MAX_PAGES`] pages.
    async fn get_all<A>(&self, endpoint: &str, cap: Option<usize>) -> Result<Vec<Resource<A>>>
    where
        A: DeserializeOwned + Default,
    {
        let mut items = Vec::new();
        let mut next = Some(endpoint.to_string());
        let mut pages = 0usize;

        while let Some(page_url) = next.take() {
            let page: Collection<A> = self.get(&page_url).await?;
            pages += 1;
            next = page.next_page().map(str::to_string);
            items.extend(page.data);

            if let Some(cap) = cap {
                if items.len() >= cap {
                    items.truncate(cap);
                    break;
                }
            }
            if pages >= MAX_PAGES && next.is_some() {
                warn!(endpoint, pages, "page limit reached, ignoring further pages");
                break;
            }
        }

        debug!(endpoint, pages, items = items.len(), "collection fetched");
        Ok(items)
    }

    async fn post<T: DeserializeOwned>(&self, endpoint: &str, body: serde_json::Value) -> Result<T> {
        let response = self.api_request(Method::POST, endpoint, Some(&body)).await?;
        Ok(response.json().await?)
    }

    async fn patch(&self, endpoint: &str, body: serde_json::Value) -> Result<()> {
        self.api_request(Method::PATCH, endpoint, Some(&body)).await?;
        Ok(())
    }
}

#[async_trait]
impl ConnectBackend for AppStoreConnectClient {
    async fn find_app(&self, bundle_id: &str) -> Result<Option<AppResource>> {
        let endpoint = format!("/apps?filter[bundleId]={}&limit=1", bundle_id);
        let page: Collection<AppAttributes> = self.get(&endpoint).await?;
        Ok(page.data.into_iter().next())
    }

    async fn app_infos(&self, app_id: &str) -> Result<Vec<AppInfoResource>> {
        self.get_all(&format!("/apps/{}/appInfos", app_id), None).await
    }

    async fn app_info_localizations(
        &self,
        app_info_id: &str,
    ) -> Result<Vec<AppInfoLocalizationResource>> {
        let endpoint = format!(
            "/appInfos/{}/appInfoLocalizations?limit={}",
            app_info_id, PAGE_LIMIT
        );
        self.get_all(&endpoint, None).await
    }

    async fn app_store_versions(
        &self,
        app_id: &str,
        states: &[&str],
        limit: usize,
    ) -> Result<Vec<VersionResource>> {
        let mut endpoint = format!(
            "/apps/{}/appStoreVersions?limit={}",
            app_id,
            limit.clamp(1, PAGE_LIMIT)
        );
        if !states.is_empty() {
            endpoint.push_str("&filter[appStoreState]=");
            endpoint.push_str(&states.join(","));
        }
        self.get_all(&endpoint, Some(limit)).await
    }

    async fn version_localizations(
        &self,
        version_id: &str,
    ) -> Result<Vec<VersionLocalizationResource>> {
        let endpoint = format!(
            "/appStoreVersions/{}/appStoreVersionLocalizations?limit={}",
            version_id, PAGE_LIMIT
        );
        self.get_all(&endpoint, None).await
    }

    async fn screenshot_sets(
        &self,
        version_localization_id: &str,
    ) -> Result<Vec<ScreenshotSetResource>> {
        let endpoint = format!(
            "/appStoreVersionLocalizations/{}/appScreenshotSets?limit={}",
            version_localization_id, PAGE_LIMIT
        );
        self.get_all(&endpoint, None).await
    }

    async fn screenshots(&self, set_id: &str) -> Result<Vec<ScreenshotResource>> {
        let endpoint = format!("/appScreenshotSets/{}/appScreenshots?limit={}", set_id, PAGE_LIMIT);
        self.get_all(&endpoint, None).await
    }

    async fn update_version_localization(
        &self,
        localization_id: &str,
        update: &LocalizationUpdate,
    ) -> Result<()> {
        let body = serde_json::json!({
            "data": {
                "type": "appStoreVersionLocalizations",
                "id": localization_id,
                "attributes": update
            }
        });

        self.patch(&format!("/appStoreVersionLocalizations/{}", localization_id), body)
            .await
    }

    async fn create_version_localization(
        &self,
        version_id: &str,
        locale: &str,
        update: &LocalizationUpdate,
    ) -> Result<String> {
        let mut attributes = serde_json::to_value(update)?;
        if let Some(map) = attributes.as_object_mut() {
            map.insert("locale".to_string(), serde_json::Value::String(locale.to_string()));
        }

        let body = serde_json::json!({
            "data": {
                "type": "appStoreVersionLocalizations",
                "attributes": attributes,
                "relationships": {
                    "appStoreVersion": {
                        "data": { "type": "appStoreVersions", "id": version_id }
                    }
                }
            }
        });

        let created: Single<VersionLocalizationAttributes> =
            self.post("/appStoreVersionLocalizations", body).await?;
        Ok(created.data.id)
    }

    async fn update_app_info_localization(
        &self,
        localization_id: &str,
        name: Option<&str>,
        subtitle: Option<&str>,
    ) -> Result<()> {
        let body = serde_json::json!({
            "data": {
                "type": "appInfoLocalizations",
                "id": localization_id,
                "attributes": app_info_attributes(None, name, subtitle)
            }
        });

        self.patch(&format!("/appInfoLocalizations/{}", localization_id), body)
            .await
    }

    async fn create_app_info_localization(
        &self,
        app_info_id: &str,
        locale: &str,
        name: Option<&str>,
        subtitle: Option<&str>,
    ) -> Result<String> {
        let body = serde_json::json!({
            "data": {
                "type": "appInfoLocalizations",
                "attributes": app_info_attributes(Some(locale), name, subtitle),
                "relationships": {
                    "appInfo": {
                        "data": { "type": "appInfos", "id": app_info_id }
                    }
                }
            }
        });

        let created: Single<AppInfoLocalizationAttributes> =
            self.post("/appInfoLocalizations", body).await?;
        Ok(created.data.id)
    }

    async fn create_screenshot_set(
        &self,
        version_localization_id: &str,
        display_type: &str,
    ) -> Result<String> {
        let body = serde_json::json!({
            "data": {
                "type": "appScreenshotSets",
                "attributes": { "screenshotDisplayType": display_type },
                "relationships": {
                    "appStoreVersionLocalization": {
                        "data": { "type": "appStoreVersionLocalizations", "id": version_localization_id }
                    }
                }
            }
        });

        let created: Single<ScreenshotSetAttributes> = self.post("/appScreenshotSets", body).await?;
        Ok(created.data.id)
    }

    async fn reserve_screenshot(
        &self,
        set_id: &str,
        file_name: &str,
        file_size: u64,
    ) -> Result<ScreenshotResource> {
        let body = serde_json::json!({
            "data": {
                "type": "appScreenshots",
                "attributes": { "fileName": file_name, "fileSize": file_size },
                "relationships": {
                    "appScreenshotSet": {
                        "data": { "type": "appScreenshotSets", "id": set_id }
                    }
                }
            }
        });

        let reserved: Single<ScreenshotAttributes> = self.post("/appScreenshots", body).await?;
        Ok(reserved.data)
    }

    async fn upload_asset_part(&self, operation: &UploadOperation, bytes: Vec<u8>) -> Result<()> {
        let method = operation
            .method
            .as_deref()
            .and_then(|m| Method::from_bytes(m.as_bytes()).ok())
            .unwrap_or(Method::PUT);

        let mut request = self.client.request(method, &operation.url).body(bytes);
        for header in &operation.request_headers {
            request = request.header(header.name.as_str(), header.value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MetadataError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    async fn commit_screenshot(&self, screenshot_id: &str, checksum: &str) -> Result<()> {
        let body = serde_json::json!({
            "data": {
                "type": "appScreenshots",
                "id": screenshot_id,
                "attributes": { "uploaded": true, "sourceFileChecksum": checksum }
            }
        });

        self.patch(&format!("/appScreenshots/{}", screenshot_id), body)
            .await
    }
}

fn app_info_attributes(
    locale: Option<&str>,
    name: Option<&str>,
    subtitle: Option<&str>,
) -> serde_json::Map<String, serde_json::Value> {
    [("locale", locale), ("name", name), ("subtitle", subtitle)]
        .into_iter()
        .filter_map(|(key, value)| {
            value.map(|v| (key.to_string(), serde_json::Value::String(v.to_string())))
        })
        .collect()
}
