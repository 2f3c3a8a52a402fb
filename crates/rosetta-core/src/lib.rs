//! Rosetta Core - shared foundations for the Rosetta localization toolkit
//!
//! This crate provides the error types, the [`Outcome`] result wrapper used by
//! every degradable operation, and the configuration layer (`.env` files,
//! environment variables and `rosetta.toml`).

pub mod config;
pub mod error;
pub mod outcome;

pub use config::{ConnectCredentials, Environment, ProjectConfig, Settings};
pub use error::{ConfigError, CoreError, Result};
pub use outcome::Outcome;
