//! Store version status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Review state of an App Store version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppStoreState {
    PrepareForSubmission,
    DeveloperRejected,
    MetadataRejected,
    Rejected,
    InvalidBinary,
    WaitingForReview,
    InReview,
    PendingDeveloperRelease,
    PendingAppleRelease,
    ProcessingForAppStore,
    ReadyForSale,
    /// Any state this crate does not classify.
    Other(String),
}

impl AppStoreState {
    /// Parses the wire value (e.g. `PREPARE_FOR_SUBMISSION`).
    pub fn parse(value: &str) -> Self {
        match value {
            "PREPARE_FOR_SUBMISSION" => Self::PrepareForSubmission,
            "DEVELOPER_REJECTED" => Self::DeveloperRejected,
            "METADATA_REJECTED" => Self::MetadataRejected,
            "REJECTED" => Self::Rejected,
            "INVALID_BINARY" => Self::InvalidBinary,
            "WAITING_FOR_REVIEW" => Self::WaitingForReview,
            "IN_REVIEW" => Self::InReview,
            "PENDING_DEVELOPER_RELEASE" => Self::PendingDeveloperRelease,
            "PENDING_APPLE_RELEASE" => Self::PendingAppleRelease,
            "PROCESSING_FOR_APP_STORE" => Self::ProcessingForAppStore,
            "READY_FOR_SALE" => Self::ReadyForSale,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::PrepareForSubmission => "PREPARE_FOR_SUBMISSION",
            Self::DeveloperRejected => "DEVELOPER_REJECTED",
            Self::MetadataRejected => "METADATA_REJECTED",
            Self::Rejected => "REJECTED",
            Self::InvalidBinary => "INVALID_BINARY",
            Self::WaitingForReview => "WAITING_FOR_REVIEW",
            Self::InReview => "IN_REVIEW",
            Self::PendingDeveloperRelease => "PENDING_DEVELOPER_RELEASE",
            Self::PendingAppleRelease => "PENDING_APPLE_RELEASE",
            Self::ProcessingForAppStore => "PROCESSING_FOR_APP_STORE",
            Self::ReadyForSale => "READY_FOR_SALE",
            Self::Other(value) => value,
        }
    }

    /// Wire values of states whose localizations may be edited.
    pub const EDITABLE: [&'static str; 5] = [
        "PREPARE_FOR_SUBMISSION",
        "DEVELOPER_REJECTED",
        "REJECTED",
        "METADATA_REJECTED",
        "INVALID_BINARY",
    ];

    /// Wire values of states whose metadata is downloaded.
    pub const LIVE: [&'static str; 3] = [
        "READY_FOR_SALE",
        "PROCESSING_FOR_APP_STORE",
        "PENDING_APPLE_RELEASE",
    ];

    /// Whether localizations of a version in this state may be changed.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            Self::PrepareForSubmission
                | Self::DeveloperRejected
                | Self::MetadataRejected
                | Self::Rejected
                | Self::InvalidBinary
        )
    }

    /// Whether this is a known state that must not be edited.
    pub fn is_locked(&self) -> bool {
        !self.is_editable() && !matches!(self, Self::Other(_))
    }

    /// Short human-readable description.
    pub fn description(&self) -> String {
        match self {
            Self::PrepareForSubmission => "Ready for editing".to_string(),
            Self::DeveloperRejected | Self::MetadataRejected | Self::Rejected => {
                "Can be edited (rejected)".to_string()
            }
            Self::InvalidBinary => "Can be edited (invalid binary)".to_string(),
            Self::WaitingForReview => "Waiting for review - do not edit".to_string(),
            Self::InReview => "In review - do not edit".to_string(),
            Self::PendingDeveloperRelease => "Pending release - do not edit".to_string(),
            Self::PendingAppleRelease => "Pending Apple release - do not edit".to_string(),
            Self::ProcessingForAppStore => "Processing - do not edit".to_string(),
            Self::ReadyForSale => "Published - do not edit".to_string(),
            Self::Other(value) => format!("Unknown status: {}", value),
        }
    }
}

impl fmt::Display for AppStoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One App Store version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub id: String,
    pub version_string: String,
    pub app_store_state: String,
    pub created_date: Option<String>,
    pub downloadable: bool,
    pub release_type: Option<String>,
}

impl VersionInfo {
    /// Parsed review state.
    pub fn state(&self) -> AppStoreState {
        AppStoreState::parse(&self.app_store_state)
    }
}

/// Versions of an app, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionStatus {
    pub app_id: String,
    pub app_name: String,
    pub bundle_id: String,
    pub current_version: VersionInfo,
    pub all_versions: Vec<VersionInfo>,
    pub total_versions: usize,
    pub last_updated: String,
}
