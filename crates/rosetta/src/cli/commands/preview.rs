//! Preview command

use clap::Args;
use console::style;
use tracing::info;

use crate::cli::{output, require_bundle_id, Cli, OutputFormat};

/// Show a cached locale with character counts
#[derive(Debug, Args)]
pub struct PreviewCommand {
    /// Bundle ID (defaults to app.bundle_id in rosetta.toml)
    #[arg(long)]
    pub bundle_id: Option<String>,

    /// Locale to show (defaults to the cached default locale)
    #[arg(short, long)]
    pub locale: Option<String>,
}

impl PreviewCommand {
    /// Execute the preview command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let rosetta = cli.rosetta()?;
        let bundle_id = require_bundle_id(&rosetta, self.bundle_id.as_deref())?;
        info!(bundle_id = %bundle_id, locale = ?self.locale, "executing preview command");

        let preview = rosetta
            .preview_cached(&bundle_id, self.locale.as_deref())
            .await?;

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&preview)?);
            }
            OutputFormat::Text => {
                println!(
                    "{}",
                    output::header(&format!(
                        "{} {} (version {})",
                        bundle_id,
                        output::locale_style().apply_to(&preview.locale),
                        output::version_style().apply_to(&preview.version)
                    ))
                );
                for (field, value) in preview.metadata.fields() {
                    if value.is_empty() {
                        println!("{}", output::key_value(field, &style("(empty)").dim().to_string()));
                    } else {
                        println!("{}", output::key_value(field, value));
                    }
                }

                println!();
                println!("{}", style("Character counts").bold());
                for usage in &preview.usage {
                    let count = format!("{} / {}", usage.chars, usage.limit);
                    let count = if usage.over_limit() {
                        style(count).red()
                    } else {
                        style(count).green()
                    };
                    println!("  {:<12} {}", usage.field, count);
                }
                println!("  {:<12} {}", "screenshots", preview.screenshots);
            }
        }

        Ok(())
    }
}
