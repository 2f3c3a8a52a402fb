//! Metadata synchronization with App Store Connect.
//!
//! [`AppStoreService`] is the single entry point for reading listing data
//! from the store, pushing edits back and inspecting version state. It works
//! the same way whether the [`ConnectMode`] is live or offline; offline
//! reads return the bundled mock listing and offline writes are simulated.
//!
//! ## Example
//!
//! ```no_run
//! use rosetta_metadata::{AppStoreService, ConnectMode, LocalCache};
//!
//! # async fn example() {
//! let service = AppStoreService::new(ConnectMode::Offline, LocalCache::new("."), "en-US");
//! let outcome = service.download_app_info("com.example.app").await;
//! if let Some(reason) = outcome.reason() {
//!     eprintln!("degraded: {reason}");
//! }
//! # }
//! ```

mod download;
mod status;
mod upload;

use crate::cache::LocalCache;
use crate::connect::ConnectMode;

/// Reason attached to every offline outcome.
pub const OFFLINE_REASON: &str = "App Store Connect credentials not configured";

/// Ends the reason of a download that served the mock listing. Such results
/// are never cached.
pub const MOCK_DATA_NOTE: &str = "using mock data";

/// App Store Connect workflows over a live or offline backend.
#[derive(Debug, Clone)]
pub struct AppStoreService {
    mode: ConnectMode,
    cache: LocalCache,
    default_locale: String,
    debug: bool,
}

impl AppStoreService {
    pub fn new(mode: ConnectMode, cache: LocalCache, default_locale: impl Into<String>) -> Self {
        Self {
            mode,
            cache,
            default_locale: default_locale.into(),
            debug: false,
        }
    }

    /// Enables per-field logging of downloaded content.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self.cache = self.cache.with_debug(debug);
        self
    }

    pub fn mode(&self) -> &ConnectMode {
        &self.mode
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }
}
