//! Cost command

use clap::Args;
use console::style;
use tracing::info;

use rosetta_translate::{estimate_tokens, BatchTranslationRequest};

use crate::cli::{output, require_bundle_id, target_locales, Cli, OutputFormat};

/// Costs above this many dollars get a warning
const HIGH_COST_THRESHOLD: f64 = 5.0;

/// Estimate the cost of translating the cached listing
#[derive(Debug, Args)]
pub struct CostCommand {
    /// Bundle ID (defaults to app.bundle_id in rosetta.toml)
    #[arg(long)]
    pub bundle_id: Option<String>,

    /// Target locales (defaults to app.target_locales in rosetta.toml)
    #[arg(long, value_delimiter = ',')]
    pub locales: Vec<String>,

    /// Show a per-locale and per-field breakdown
    #[arg(long)]
    pub detailed: bool,
}

impl CostCommand {
    /// Execute the cost command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let rosetta = cli.rosetta()?;
        let bundle_id = require_bundle_id(&rosetta, self.bundle_id.as_deref())?;
        let locales = target_locales(&rosetta, &self.locales);
        info!(bundle_id = %bundle_id, detailed = self.detailed, "executing cost command");

        let source = rosetta.cached_source(&bundle_id, locales).await?;
        let estimate = rosetta.estimate_cost(&source.request);
        let per_locale: Vec<(String, f64)> = source
            .request
            .foreign_targets()
            .map(|locale| {
                let single = BatchTranslationRequest {
                    target_locales: vec![locale.clone()],
                    ..source.request.clone()
                };
                (locale.clone(), rosetta.estimate_cost(&single).estimated_cost)
            })
            .collect();

        match cli.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "model": rosetta.settings().project.ai.model,
                    "sourceLocale": source.source_locale,
                    "estimatedCost": estimate.estimated_cost,
                    "tokenEstimate": estimate.token_estimate,
                    "locales": per_locale
                        .iter()
                        .map(|(locale, cost)| serde_json::json!({ "locale": locale, "estimatedCost": cost }))
                        .collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            OutputFormat::Text => {
                println!("{}", output::header("Cost Estimation"));
                println!();

                if self.detailed {
                    println!("{}", style("Breakdown by locale").underlined());
                    for (locale, cost) in &per_locale {
                        println!(
                            "  {}: ${:.6}",
                            output::locale_style().apply_to(locale),
                            cost
                        );
                        for (field, value) in &source.request.metadata {
                            if let Some(text) = value.as_str().filter(|t| !t.is_empty()) {
                                println!("    - {}: ~{} tokens", field, 2 * estimate_tokens(text));
                            }
                        }
                    }
                    println!();
                }

                println!("{}", style("Summary").underlined());
                println!("{}", output::key_value("Model", &rosetta.settings().project.ai.model));
                println!("{}", output::key_value("Source locale", &source.source_locale));
                println!("{}", output::key_value("Target locales", &per_locale.len().to_string()));
                println!(
                    "{}",
                    output::key_value("Estimated tokens", &estimate.token_estimate.to_string())
                );
                println!(
                    "{}",
                    output::key_value("Estimated cost", &format!("${:.6}", estimate.estimated_cost))
                );

                if estimate.estimated_cost > HIGH_COST_THRESHOLD {
                    println!();
                    output::warning("High cost detected. Consider a smaller model, shorter content or fewer locales.");
                }
            }
        }

        Ok(())
    }
}
