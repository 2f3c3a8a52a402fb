//! Diff command

use clap::Args;
use console::style;
use rosetta::review::ChangeKind;
use rosetta_core::Outcome;
use tracing::info;

use crate::cli::{output, require_bundle_id, Cli, OutputFormat};
use crate::exit_codes;

/// Compare cached listings with App Store Connect
#[derive(Debug, Args)]
pub struct DiffCommand {
    /// Bundle ID (defaults to app.bundle_id in rosetta.toml)
    #[arg(long)]
    pub bundle_id: Option<String>,

    /// Locales to compare (defaults to every cached locale)
    #[arg(long, value_delimiter = ',')]
    pub locales: Vec<String>,
}

impl DiffCommand {
    /// Execute the diff command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let rosetta = cli.rosetta()?;
        let bundle_id = require_bundle_id(&rosetta, self.bundle_id.as_deref())?;
        info!(bundle_id = %bundle_id, "executing diff command");

        let pb = output::spinner(
            "Fetching live listing...",
            cli.quiet || cli.format == OutputFormat::Json,
        );
        let outcome = rosetta.diff_cached(&bundle_id, &self.locales).await?;
        pb.finish_and_clear();

        match cli.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "status": outcome.status(),
                    "reason": outcome.reason(),
                    "locales": outcome.value(),
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            OutputFormat::Text => {
                let diffs = match &outcome {
                    Outcome::Fatal(reason) => {
                        output::error(reason);
                        std::process::exit(exit_codes::REMOTE_ERROR);
                    }
                    Outcome::Ok(diffs) | Outcome::Degraded { value: diffs, .. } => diffs,
                };
                output::report_degraded(&outcome);

                let changed: Vec<_> = diffs.iter().filter(|d| !d.is_unchanged()).collect();
                for diff in &changed {
                    let suffix = if diff.new_locale { " (new locale)" } else { "" };
                    println!("{}{}", output::locale_style().apply_to(&diff.locale), suffix);
                    for change in &diff.changes {
                        let kind = match change.kind {
                            ChangeKind::Added => style(change.kind.as_str()).green(),
                            ChangeKind::Removed => style(change.kind.as_str()).red(),
                            ChangeKind::Modified => style(change.kind.as_str()).yellow(),
                        };
                        println!("    {:<12} {}", change.field, kind);
                    }
                }

                if changed.is_empty() {
                    output::success("Cached listing matches App Store Connect");
                } else if !cli.quiet {
                    let total: usize = changed.iter().map(|d| d.changes.len()).sum();
                    println!();
                    output::info(&format!(
                        "{} locale(s) with {} change(s); run `rosetta push` to upload them",
                        changed.len(),
                        total
                    ));
                }
            }
        }

        Ok(())
    }
}
