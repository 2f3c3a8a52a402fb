//! App Store metadata management for Rosetta.
//!
//! This crate talks to App Store Connect to download listing metadata and
//! screenshots, writes them to a local cache that translation workflows read,
//! validates listing content and pushes edited metadata back.

pub mod cache;
pub mod connect;
pub mod error;
pub mod screenshots;
pub mod sync;
pub mod types;
pub mod utils;
pub mod validation;

pub use cache::LocalCache;
pub use connect::{AppStoreConnectClient, ConnectBackend, ConnectMode};
pub use error::MetadataError;
pub use screenshots::{resolve_image_url, sanitize_file_name, ScreenshotSynchronizer};
pub use sync::AppStoreService;
pub use types::metadata::{AppMetadata, DownloadResult, LocaleMetadata, UploadResult};
pub use types::screenshots::{ManifestItem, ManifestSet, ScreenshotManifest, ScreenshotStats};
pub use types::status::{AppStoreState, VersionInfo, VersionStatus};
pub use validation::{validate_content, ContentInput, ContentValidation};

/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, MetadataError>;
