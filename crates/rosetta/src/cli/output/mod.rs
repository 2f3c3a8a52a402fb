//! Output formatting utilities

use console::{style, Style};
use indicatif::{ProgressBar, ProgressStyle};
use rosetta_core::Outcome;
use std::time::Duration;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for version numbers
pub fn version_style() -> Style {
    Style::new().green().bold()
}

/// Style for locale codes
pub fn locale_style() -> Style {
    Style::new().yellow()
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// Spinner shown while waiting on the network. Hidden when `quiet`.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(template);
    }
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(message.to_string());
    pb
}

/// One-word status of an outcome, for text output
pub fn outcome_label<T>(outcome: &Outcome<T>) -> String {
    match outcome {
        Outcome::Ok(_) => style("ok").green().to_string(),
        Outcome::Degraded { .. } => style("degraded").yellow().to_string(),
        Outcome::Fatal(_) => style("failed").red().to_string(),
    }
}

/// Print the degradation reason of an outcome, if any
pub fn report_degraded<T>(outcome: &Outcome<T>) {
    if let Outcome::Degraded { reason, .. } = outcome {
        warning(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_label_mentions_status() {
        assert!(outcome_label(&Outcome::Ok(1)).contains("ok"));
        assert!(outcome_label(&Outcome::degraded(1, "mock")).contains("degraded"));
        assert!(outcome_label::<i32>(&Outcome::fatal("no")).contains("failed"));
    }

    #[test]
    fn test_hidden_spinner_when_quiet() {
        assert!(spinner("working", true).is_hidden());
    }
}
