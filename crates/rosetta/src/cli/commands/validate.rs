//! Validate command

use clap::Args;
use console::style;
use tracing::info;

use crate::cli::{output, require_bundle_id, Cli, OutputFormat};
use crate::exit_codes;

/// Validate cached listings against App Store limits
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Bundle ID (defaults to app.bundle_id in rosetta.toml)
    #[arg(long)]
    pub bundle_id: Option<String>,

    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let rosetta = cli.rosetta()?;
        let bundle_id = require_bundle_id(&rosetta, self.bundle_id.as_deref())?;
        info!(bundle_id = %bundle_id, strict = self.strict, "executing validate command");

        let results = rosetta.validate_cached(&bundle_id).await?;
        let errors: usize = results.iter().map(|(_, v)| v.errors.len()).sum();
        let warnings: usize = results.iter().map(|(_, v)| v.warnings.len()).sum();
        let failed = errors > 0 || (self.strict && warnings > 0);

        match cli.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": !failed,
                    "locales": results
                        .iter()
                        .map(|(locale, v)| serde_json::json!({
                            "locale": locale,
                            "valid": v.valid,
                            "warnings": v.warnings,
                            "errors": v.errors,
                        }))
                        .collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!(
                        "{} cached listings for {}",
                        style("Validating").cyan(),
                        style(&bundle_id).bold()
                    );
                    println!();
                }

                for (locale, validation) in &results {
                    let marker = if !validation.valid {
                        style("✗").red()
                    } else if validation.warnings.is_empty() {
                        style("✓").green()
                    } else {
                        style("!").yellow()
                    };
                    if !cli.quiet || !validation.valid {
                        println!("{} {}", marker, output::locale_style().apply_to(locale));
                    }
                    for error in &validation.errors {
                        println!("    {} {}", style("error:").red(), error);
                    }
                    if !cli.quiet {
                        for warning in &validation.warnings {
                            println!("    {} {}", style("warning:").yellow(), warning);
                        }
                    }
                }

                if !cli.quiet {
                    println!();
                }
                if failed {
                    output::error(&format!(
                        "Validation failed: {} error(s), {} warning(s)",
                        errors, warnings
                    ));
                } else if !cli.quiet {
                    output::success(&format!(
                        "{} locale(s) valid ({} warning(s))",
                        results.len(),
                        warnings
                    ));
                }
            }
        }

        if failed {
            std::process::exit(exit_codes::VALIDATION_ERROR);
        }

        Ok(())
    }
}
