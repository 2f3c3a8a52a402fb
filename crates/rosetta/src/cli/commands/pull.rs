//! Pull command

use clap::Args;
use rosetta_core::Outcome;
use rosetta_metadata::sync::MOCK_DATA_NOTE;
use tracing::info;

use crate::cli::{output, require_bundle_id, Cli, OutputFormat};
use crate::exit_codes;

/// Download the current listing from App Store Connect
#[derive(Debug, Args)]
pub struct PullCommand {
    /// Bundle ID (defaults to app.bundle_id in rosetta.toml)
    #[arg(long)]
    pub bundle_id: Option<String>,
}

impl PullCommand {
    /// Execute the pull command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let rosetta = cli.rosetta()?;
        let bundle_id = require_bundle_id(&rosetta, self.bundle_id.as_deref())?;
        info!(bundle_id = %bundle_id, "executing pull command");

        let pb = output::spinner(
            &format!("Downloading {} from App Store Connect...", bundle_id),
            cli.quiet || cli.format == OutputFormat::Json,
        );
        let outcome = rosetta.download(&bundle_id).await;
        pb.finish_and_clear();

        match cli.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "status": outcome.status(),
                    "reason": outcome.reason(),
                    "result": outcome.value(),
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            OutputFormat::Text => {
                let result = match &outcome {
                    Outcome::Fatal(reason) => {
                        output::error(reason);
                        std::process::exit(exit_codes::REMOTE_ERROR);
                    }
                    Outcome::Ok(result) | Outcome::Degraded { value: result, .. } => result,
                };

                if !cli.quiet {
                    println!("{}", output::header(&format!("Listing for {}", bundle_id)));
                    println!(
                        "{}",
                        output::key_value(
                            "Version",
                            &output::version_style().apply_to(result.version()).to_string()
                        )
                    );
                    for locale in &result.locales {
                        let name = result.get(locale).map(|m| m.name.as_str()).unwrap_or("");
                        println!(
                            "  {} {}",
                            output::locale_style().apply_to(locale),
                            name
                        );
                    }
                    println!();
                }

                output::report_degraded(&outcome);
                let mocked = outcome.reason().is_some_and(|r| r.ends_with(MOCK_DATA_NOTE));
                if !mocked && !cli.quiet {
                    output::success(&format!(
                        "Saved {} locale(s) to {}",
                        result.locales.len(),
                        output::path_style().apply_to(rosetta.cache().app_dir(&bundle_id).display())
                    ));
                } else if mocked && !cli.quiet {
                    output::info("Mock data is not written to the cache");
                }
            }
        }

        Ok(())
    }
}
