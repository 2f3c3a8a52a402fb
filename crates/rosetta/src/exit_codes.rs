//! Exit codes for the CLI

/// Validation found errors
pub const VALIDATION_ERROR: i32 = 5;

/// A remote operation produced no result
pub const REMOTE_ERROR: i32 = 6;
