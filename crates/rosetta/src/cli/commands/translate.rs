//! Translate command

use clap::Args;
use rosetta_core::Outcome;
use tracing::info;

use crate::cli::{output, require_bundle_id, target_locales, Cli, OutputFormat};
use crate::exit_codes;

/// Translate the cached listing into other locales
#[derive(Debug, Args)]
pub struct TranslateCommand {
    /// Bundle ID (defaults to app.bundle_id in rosetta.toml)
    #[arg(long)]
    pub bundle_id: Option<String>,

    /// Target locales (defaults to app.target_locales in rosetta.toml)
    #[arg(long, value_delimiter = ',')]
    pub locales: Vec<String>,

    /// Chat model to use instead of ai.model
    #[arg(long)]
    pub model: Option<String>,

    /// Write mock translations to the cache when no API key is set
    #[arg(long)]
    pub write_mock: bool,
}

impl TranslateCommand {
    /// Execute the translate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let mut settings = cli.settings()?;
        if let Some(model) = &self.model {
            settings.project.ai.model = model.clone();
        }
        let rosetta = rosetta::Rosetta::initialize(settings);

        let bundle_id = require_bundle_id(&rosetta, self.bundle_id.as_deref())?;
        let locales = target_locales(&rosetta, &self.locales);
        if locales.is_empty() {
            anyhow::bail!("No target locales. Pass --locales or set app.target_locales in rosetta.toml.");
        }
        info!(bundle_id = %bundle_id, locales = %locales.join(","), "executing translate command");

        let pb = output::spinner(
            &format!("Translating into {}...", locales.join(", ")),
            cli.quiet || cli.format == OutputFormat::Json,
        );
        let outcome = rosetta.translate_cached(&bundle_id, locales, self.write_mock).await?;
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
                let cached = match &outcome {
                    Outcome::Fatal(reason) => {
                        output::error(reason);
                        std::process::exit(exit_codes::REMOTE_ERROR);
                    }
                    Outcome::Ok(cached) | Outcome::Degraded { value: cached, .. } => cached,
                };

                output::report_degraded(&outcome);
                if !cli.quiet {
                    println!(
                        "{}",
                        output::header(&format!(
                            "Translated from {} (version {})",
                            cached.source_locale, cached.version
                        ))
                    );
                    for locale in cached.result.translations.keys() {
                        let name = cached.result.text(locale, "name").unwrap_or("");
                        println!("  {} {}", output::locale_style().apply_to(locale), name);
                    }
                    println!();
                    println!(
                        "{}",
                        output::key_value(
                            "Tokens",
                            &format!(
                                "{} in / {} out",
                                cached.result.tokens_used.input, cached.result.tokens_used.output
                            )
                        )
                    );
                    println!(
                        "{}",
                        output::key_value("Cost", &format!("${:.4}", cached.result.total_cost))
                    );
                    if cached.written.is_empty() && !rosetta.translator().is_live() {
                        output::warning("Mock translations were not cached; pass --write-mock to keep them");
                    } else {
                        output::success(&format!("Wrote {} locale(s) to the cache", cached.written.len()));
                    }
                }
            }
        }

        Ok(())
    }
}
