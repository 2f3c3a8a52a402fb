//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rosetta::Rosetta;
use rosetta_core::config::{load_config, vars};
use rosetta_core::{Environment, Settings};
use tracing::debug;

use commands::{
    CostCommand, DiffCommand, InitCommand, PreviewCommand, PullCommand, PushCommand,
    StatusCommand, TranslateCommand, ValidateCommand,
};

/// Rosetta - App Store Connect localization CLI
#[derive(Debug, Parser)]
#[command(name = "rosetta")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Project configuration file (defaults to ./rosetta.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize a new Rosetta project
    Init(InitCommand),

    /// Download the current listing from App Store Connect
    Pull(PullCommand),

    /// Translate the cached listing
    Translate(TranslateCommand),

    /// Estimate translation cost
    Cost(CostCommand),

    /// Validate cached listings against App Store limits
    Validate(ValidateCommand),

    /// Show a cached locale with character counts
    Preview(PreviewCommand),

    /// Compare cached listings with App Store Connect
    Diff(DiffCommand),

    /// Show App Store version status
    Status(StatusCommand),

    /// Upload cached listings to App Store Connect
    Push(PushCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Pull(ref cmd) => cmd.execute(&self),
            Commands::Translate(ref cmd) => cmd.execute(&self),
            Commands::Cost(ref cmd) => cmd.execute(&self),
            Commands::Validate(ref cmd) => cmd.execute(&self),
            Commands::Preview(ref cmd) => cmd.execute(&self),
            Commands::Diff(ref cmd) => cmd.execute(&self),
            Commands::Status(ref cmd) => cmd.execute(&self),
            Commands::Push(ref cmd) => cmd.execute(&self),
        }
    }

    /// Resolve settings for the current directory.
    ///
    /// With `-C` the cache lives in that directory rather than in the
    /// shell's `PWD`. An explicit `--config` must load.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let cwd = std::env::current_dir()?;
        let mut env = Environment::capture(&cwd);
        if self.directory.is_some() {
            env.set(vars::PWD, cwd.to_string_lossy());
        }

        let mut settings = Settings::from_environment(&env, &cwd);
        if let Some(path) = &self.config {
            settings.project = load_config(path)?;
        }
        debug!(cache_root = %settings.cache_root.display(), "settings resolved");
        Ok(settings)
    }

    /// Build the Rosetta context from resolved settings
    pub fn rosetta(&self) -> anyhow::Result<Rosetta> {
        Ok(Rosetta::initialize(self.settings()?))
    }
}

/// Bundle id from the flag or `rosetta.toml`
pub fn require_bundle_id(rosetta: &Rosetta, explicit: Option<&str>) -> anyhow::Result<String> {
    rosetta
        .bundle_id(explicit)
        .map(str::to_string)
        .ok_or_else(|| {
            anyhow::anyhow!("No bundle id given. Pass --bundle-id or set app.bundle_id in rosetta.toml.")
        })
}

/// Target locales from the flag or `rosetta.toml`
pub fn target_locales(rosetta: &Rosetta, explicit: &[String]) -> Vec<String> {
    if explicit.is_empty() {
        rosetta.settings().project.app.target_locales.clone()
    } else {
        explicit.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from([
            "rosetta", "--format", "json", "-C", "/tmp", "pull", "--bundle-id", "com.example.app",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.directory, Some(PathBuf::from("/tmp")));
        assert!(matches!(cli.command, Commands::Pull(_)));
    }

    #[test]
    fn test_parse_translate_locales() {
        let cli = Cli::parse_from(["rosetta", "translate", "--locales", "fr-FR,de-DE", "-q"]);
        assert!(cli.quiet);
        match cli.command {
            Commands::Translate(cmd) => assert_eq!(cmd.locales, vec!["fr-FR", "de-DE"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_preview_and_diff() {
        let cli = Cli::parse_from(["rosetta", "preview", "-l", "fr-FR"]);
        match cli.command {
            Commands::Preview(cmd) => assert_eq!(cmd.locale.as_deref(), Some("fr-FR")),
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::parse_from(["rosetta", "diff", "--locales", "en-US,it-IT"]);
        match cli.command {
            Commands::Diff(cmd) => assert_eq!(cmd.locales, vec!["en-US", "it-IT"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
