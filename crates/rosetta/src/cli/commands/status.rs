//! Status command

use clap::Args;
use console::style;
use tracing::info;

use rosetta_core::Outcome;
use rosetta_metadata::{AppStoreState, VersionInfo, VersionStatus};

use crate::cli::{output, require_bundle_id, Cli, OutputFormat};
use crate::exit_codes;

/// Show App Store version status and what to do next
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Bundle ID (defaults to app.bundle_id in rosetta.toml)
    #[arg(long)]
    pub bundle_id: Option<String>,

    /// List every recent version
    #[arg(long)]
    pub all_versions: bool,

    /// Show creation date, release type and downloadability
    #[arg(long)]
    pub detailed: bool,
}

impl StatusCommand {
    /// Execute the status command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let rosetta = cli.rosetta()?;
        let bundle_id = require_bundle_id(&rosetta, self.bundle_id.as_deref())?;
        info!(bundle_id = %bundle_id, "executing status command");

        let pb = output::spinner(
            "Fetching version information...",
            cli.quiet || cli.format == OutputFormat::Json,
        );
        let outcome = rosetta.version_status(&bundle_id).await;
        pb.finish_and_clear();

        let status = match outcome {
            Outcome::Ok(status) | Outcome::Degraded { value: status, .. } => status,
            Outcome::Fatal(reason) => {
                if cli.format == OutputFormat::Json {
                    let json = serde_json::json!({ "status": "fatal", "reason": reason });
                    println!("{}", serde_json::to_string_pretty(&json)?);
                } else {
                    output::error(&reason);
                }
                std::process::exit(exit_codes::REMOTE_ERROR);
            }
        };

        match cli.format {
            OutputFormat::Json => {
                let state = status.current_version.state();
                let json = serde_json::json!({
                    "status": "ok",
                    "result": status,
                    "editable": state.is_editable(),
                    "description": state.description(),
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            OutputFormat::Text => self.print_text(&status),
        }

        Ok(())
    }

    fn print_text(&self, status: &VersionStatus) {
        println!("{}", output::header("App Store Connect Status"));
        println!("{}", output::key_value("App", &status.app_name));
        println!("{}", output::key_value("Bundle ID", &status.bundle_id));
        println!();

        print_version(&status.current_version, true, self.detailed);

        if self.all_versions {
            println!();
            println!("{}", style("Version History").underlined());
            for version in &status.all_versions {
                print_version(version, false, false);
            }
        }

        println!();
        println!("{}", style("Recommendations").underlined());
        for line in recommendations(&status.current_version) {
            println!("  {}", line);
        }
    }
}

fn print_version(version: &VersionInfo, current: bool, detailed: bool) {
    let state = version.state();
    let label = if current { "Current version" } else { "Version" };
    println!(
        "{} {} {}",
        style(label).bold(),
        output::version_style().apply_to(&version.version_string),
        style(format!("({})", version.app_store_state)).dim()
    );

    let description = if state.is_editable() {
        style(state.description()).green()
    } else if state.is_locked() {
        style(state.description()).red()
    } else {
        style(state.description()).yellow()
    };
    println!("  Status: {}", description);

    if detailed {
        if let Some(created) = &version.created_date {
            println!("{}", output::key_value("Created", created));
        }
        if let Some(release_type) = &version.release_type {
            println!("{}", output::key_value("Release type", release_type));
        }
        println!(
            "{}",
            output::key_value("Downloadable", if version.downloadable { "yes" } else { "no" })
        );
    }

    if current {
        if state.is_editable() {
            println!("  {}", style("Safe to proceed with localization work").green());
        } else {
            println!("  {}", style("Localization editing not recommended").red());
        }
    }
}

/// Next steps for the current version's state
fn recommendations(version: &VersionInfo) -> Vec<String> {
    let v = &version.version_string;
    match version.state() {
        AppStoreState::PrepareForSubmission => vec![
            format!("Version {} is ready for localization work:", v),
            "1. rosetta pull       # get current content".to_string(),
            "2. rosetta translate  # generate translations".to_string(),
            "3. rosetta push       # upload when ready".to_string(),
        ],
        AppStoreState::DeveloperRejected
        | AppStoreState::MetadataRejected
        | AppStoreState::Rejected
        | AppStoreState::InvalidBinary => vec![
            format!("Version {} was rejected but can be edited:", v),
            "1. Review the rejection reasons in App Store Connect".to_string(),
            "2. Fix the issues and update localizations if needed".to_string(),
            "3. Use the normal workflow: pull, translate, push".to_string(),
        ],
        AppStoreState::WaitingForReview | AppStoreState::InReview => vec![
            format!("Version {} is in review. Do not modify localizations now.", v),
            "Wait for the review to complete, or create a new version for urgent changes".to_string(),
        ],
        AppStoreState::ReadyForSale => vec![
            format!("Version {} is live in the App Store. For new localization work:", v),
            "1. Create a new app version in App Store Connect".to_string(),
            "2. Run rosetta status to confirm it is editable".to_string(),
            "3. Continue with pull, translate, push".to_string(),
        ],
        state if state.is_locked() => vec![format!(
            "Version {} is locked ({}). Wait until it can be edited.",
            v, state
        )],
        state => vec![format!(
            "Unknown status {} for version {}. Check App Store Connect manually.",
            state, v
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(state: &str) -> VersionInfo {
        VersionInfo {
            id: "v1".to_string(),
            version_string: "2.1".to_string(),
            app_store_state: state.to_string(),
            created_date: None,
            downloadable: false,
            release_type: None,
        }
    }

    #[test]
    fn test_recommendations_follow_state() {
        assert!(recommendations(&version("PREPARE_FOR_SUBMISSION"))[0].contains("ready"));
        assert!(recommendations(&version("METADATA_REJECTED"))[0].contains("rejected"));
        assert!(recommendations(&version("IN_REVIEW"))[0].contains("in review"));
        assert!(recommendations(&version("READY_FOR_SALE"))[0].contains("live"));
        assert!(recommendations(&version("PENDING_DEVELOPER_RELEASE"))[0].contains("locked"));
        assert!(recommendations(&version("SOMETHING_NEW"))[0].contains("Unknown status SOMETHING_NEW"));
    }
}
