//! CLI commands

mod cost;
mod diff;
mod init;
mod preview;
mod pull;
mod push;
mod status;
mod translate;
mod validate;

pub use cost::CostCommand;
pub use diff::DiffCommand;
pub use init::InitCommand;
pub use preview::PreviewCommand;
pub use pull::PullCommand;
pub use push::PushCommand;
pub use status::StatusCommand;
pub use translate::TranslateCommand;
pub use validate::ValidateCommand;
