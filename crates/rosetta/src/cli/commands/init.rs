//! Init command

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use dialoguer::{Confirm, Input};
use tracing::info;

use rosetta_core::config::{default_config_toml, CONFIG_FILE_NAME, DEFAULT_LOCALE, ENV_FILE_NAME};

use crate::cli::output;
use crate::cli::Cli;

/// Credentials template written next to the project file
const ENV_TEMPLATE: &str = "# App Store Connect API credentials
ISSUER_ID=your_issuer_id_here
KEY_ID=your_key_id_here
PRIVATE_KEY_PATH=./AuthKey_YOUR_KEY_ID.p8

# OpenAI API key (optional, for AI translations)
OPENAI_API_KEY=your_openai_api_key_here
";

/// Initialize a new Rosetta project
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Bundle ID of the app (prompted for when omitted)
    #[arg(long)]
    pub bundle_id: Option<String>,

    /// Source locale for translations
    #[arg(long, default_value = DEFAULT_LOCALE)]
    pub default_locale: String,

    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Use defaults without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, yes = self.yes, "executing init command");
        let cwd = std::env::current_dir()?;
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| cwd.join(CONFIG_FILE_NAME));

        if config_path.exists() && !self.force {
            if self.yes {
                anyhow::bail!(
                    "Configuration file already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
            }

            let overwrite = Confirm::new()
                .with_prompt(format!(
                    "Configuration file already exists at {}. Overwrite?",
                    config_path.display()
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }
        }

        let bundle_id = match &self.bundle_id {
            Some(id) => id.trim().to_string(),
            None if self.yes => anyhow::bail!("--bundle-id is required with --yes"),
            None => Input::<String>::new()
                .with_prompt("Bundle ID (e.g. com.example.myapp)")
                .interact_text()?
                .trim()
                .to_string(),
        };
        if bundle_id.is_empty() {
            anyhow::bail!("Bundle ID cannot be empty");
        }

        std::fs::write(&config_path, default_config_toml(&bundle_id, &self.default_locale))?;
        let env_created = write_env_template(&cwd)?;

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                output::path_style().apply_to(config_path.display())
            ));
            println!("{}", output::key_value("Bundle ID", &bundle_id));
            println!(
                "{}",
                output::key_value(
                    "Default locale",
                    &output::locale_style().apply_to(&self.default_locale).to_string()
                )
            );
            if env_created {
                output::info(&format!(
                    "Created {} - fill in your API credentials",
                    ENV_FILE_NAME
                ));
            }
            println!();
            println!("Next steps:");
            println!("  1. Edit {} with your API credentials", ENV_FILE_NAME);
            println!("  2. Run {} to check the version you will edit", style("rosetta status").cyan());
            println!("  3. Run {} to download the current listing", style("rosetta pull").cyan());
        }

        Ok(())
    }
}

/// Writes the credentials template unless a `.env` already exists.
fn write_env_template(dir: &Path) -> anyhow::Result<bool> {
    let path: PathBuf = dir.join(ENV_FILE_NAME);
    if path.exists() {
        return Ok(false);
    }
    std::fs::write(&path, ENV_TEMPLATE)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_env_template_is_not_overwritten() {
        let temp = TempDir::new().unwrap();
        assert!(write_env_template(temp.path()).unwrap());
        std::fs::write(temp.path().join(".env"), "KEY_ID=mine\n").unwrap();
        assert!(!write_env_template(temp.path()).unwrap());
        assert_eq!(
            std::fs::read_to_string(temp.path().join(".env")).unwrap(),
            "KEY_ID=mine\n"
        );
    }

    #[test]
    fn test_env_template_parses() {
        let vars = rosetta_core::config::parse_env_file(ENV_TEMPLATE);
        assert_eq!(vars.len(), 4);
        assert_eq!(vars[0].0, "ISSUER_ID");
    }
}
