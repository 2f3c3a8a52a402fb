//! Push command

use clap::Args;
use console::style;
use dialoguer::Confirm;
use tracing::info;

use rosetta_core::Outcome;

use crate::cli::{output, require_bundle_id, Cli, OutputFormat};
use crate::exit_codes;

/// Upload cached listings to App Store Connect
#[derive(Debug, Args)]
pub struct PushCommand {
    /// Bundle ID (defaults to app.bundle_id in rosetta.toml)
    #[arg(long)]
    pub bundle_id: Option<String>,

    /// Locales to upload (defaults to every cached locale)
    #[arg(long, value_delimiter = ',')]
    pub locales: Vec<String>,

    /// Also upload cached screenshots
    #[arg(long)]
    pub screenshots: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl PushCommand {
    /// Execute the push command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let rosetta = cli.rosetta()?;
        let bundle_id = require_bundle_id(&rosetta, self.bundle_id.as_deref())?;
        info!(bundle_id = %bundle_id, screenshots = self.screenshots, "executing push command");

        if !self.yes {
            let proceed = Confirm::new()
                .with_prompt(format!("Upload the cached listing of {} to App Store Connect?", bundle_id))
                .default(false)
                .interact()?;
            if !proceed {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }
        }

        let pb = output::spinner(
            "Uploading to App Store Connect...",
            cli.quiet || cli.format == OutputFormat::Json,
        );
        let reports = rosetta
            .push_cached(&bundle_id, &self.locales, self.screenshots)
            .await?;
        pb.finish_and_clear();

        let fatal = reports.iter().filter(|r| r.outcome.is_fatal()).count();

        match cli.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "uploads": reports
                        .iter()
                        .map(|r| serde_json::json!({
                            "locale": r.locale,
                            "kind": r.kind,
                            "status": r.outcome.status(),
                            "reason": r.outcome.reason(),
                            "result": r.outcome.value(),
                        }))
                        .collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            OutputFormat::Text => {
                for report in &reports {
                    let detail = match &report.outcome {
                        Outcome::Ok(result) | Outcome::Degraded { value: result, .. } => {
                            result.message.clone()
                        }
                        Outcome::Fatal(reason) => reason.clone(),
                    };
                    println!(
                        "  {} {} [{}] {}",
                        output::locale_style().apply_to(&report.locale),
                        report.kind,
                        output::outcome_label(&report.outcome),
                        detail
                    );
                    if let Some(result) = report.outcome.value() {
                        for error in &result.errors {
                            println!("      {} {}", style("error:").red(), error);
                        }
                    }
                }

                if let Some(report) = reports.iter().find(|r| r.outcome.is_degraded()) {
                    output::report_degraded(&report.outcome);
                }
                if fatal == 0 && !cli.quiet {
                    output::success(&format!("Pushed {} upload(s) for {}", reports.len(), bundle_id));
                } else if fatal > 0 {
                    output::error(&format!("{} of {} upload(s) failed", fatal, reports.len()));
                }
            }
        }

        if fatal > 0 {
            std::process::exit(exit_codes::REMOTE_ERROR);
        }

        Ok(())
    }
}
