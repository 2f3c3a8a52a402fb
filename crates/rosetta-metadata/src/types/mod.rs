//! Data model shared by the download, cache and upload flows.

pub mod metadata;
pub mod screenshots;
pub mod status;
