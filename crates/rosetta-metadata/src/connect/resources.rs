//! App Store Connect JSON:API resource shapes.
//!
//! Only the attributes Rosetta reads are modelled; everything else in a
//! response is ignored. Every attribute is optional because the API omits
//! unset values.

use serde::{Deserialize, Serialize};

/// A single resource object.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Resource<A> {
    pub id: String,
    #[serde(default)]
    pub attributes: A,
}

impl<A> Resource<A> {
    pub fn new(id: impl Into<String>, attributes: A) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }
}

/// A page of resources.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de> + Default"))]
pub struct Collection<A> {
    #[serde(default = "Vec::new")]
    pub data: Vec<Resource<A>>,
    #[serde(default)]
    pub links: Option<PageLinks>,
}

impl<A> Collection<A> {
    /// Absolute URL of the next page, if there is one.
    pub fn next_page(&self) -> Option<&str> {
        self.links.as_ref().and_then(|links| links.next.as_deref())
    }
}

/// Pagination links of a collection response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<String>,
}

/// Response wrapping one resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de> + Default"))]
pub struct Single<A> {
    pub data: Resource<A>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppAttributes {
    pub name: Option<String>,
    pub bundle_id: Option<String>,
    pub primary_locale: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfoAttributes {
    pub app_store_state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfoLocalizationAttributes {
    pub locale: Option<String>,
    pub name: Option<String>,
    pub subtitle: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionAttributes {
    pub platform: Option<String>,
    pub version_string: Option<String>,
    pub app_store_state: Option<String>,
    pub created_date: Option<String>,
    pub downloadable: Option<bool>,
    pub release_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionLocalizationAttributes {
    pub locale: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub whats_new: Option<String>,
    pub promotional_text: Option<String>,
}

/// Writable fields of a version localization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whats_new: Option<String>,
}

impl LocalizationUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.keywords.is_none() && self.whats_new.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotSetAttributes {
    pub screenshot_display_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotAttributes {
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub source_file_url: Option<String>,
    pub image_asset: Option<ImageAsset>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub upload_operations: Option<Vec<UploadOperation>>,
}

/// Image location of an uploaded screenshot.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAsset {
    pub url: Option<String>,
    pub template_url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub file_type: Option<String>,
    pub format: Option<String>,
}

/// One part of a reserved asset upload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOperation {
    pub method: Option<String>,
    pub url: String,
    pub length: u64,
    pub offset: u64,
    #[serde(default)]
    pub request_headers: Vec<UploadHeader>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UploadHeader {
    pub name: String,
    pub value: String,
}

pub type AppResource = Resource<AppAttributes>;
pub type AppInfoResource = Resource<AppInfoAttributes>;
pub type AppInfoLocalizationResource = Resource<AppInfoLocalizationAttributes>;
pub type VersionResource = Resource<VersionAttributes>;
pub type VersionLocalizationResource = Resource<VersionLocalizationAttributes>;
pub type ScreenshotSetResource = Resource<ScreenshotSetAttributes>;
pub type ScreenshotResource = Resource<ScreenshotAttributes>;
