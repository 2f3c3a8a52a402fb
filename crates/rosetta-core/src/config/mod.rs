//! Configuration system for Rosetta

pub mod defaults;
mod env;
mod loader;
mod settings;
mod types;
pub mod validation;

pub use defaults::*;
pub use env::*;
pub use loader::*;
pub use settings::*;
pub use types::*;
pub use validation::*;
