//! CLI command definitions and the final status line.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use colored::Colorize;

use cpd_reply::orchestrator::ReplyOutcome;

/// One-line, colored summary of a reply run for stderr.
pub fn status_line(outcome: &ReplyOutcome) -> String {
    match outcome {
        ReplyOutcome::Posted { .. } => format!("{} {outcome}", "✔".green().bold()),
        ReplyOutcome::DryRun { .. } => format!("{} {outcome}", "ℹ".blue().bold()),
        ReplyOutcome::Skipped(_) | ReplyOutcome::EmptyReply => {
            format!("{} {outcome}", "⏭".yellow().bold())
        }
        ReplyOutcome::ModelFailed(_) => format!("{} {outcome}", "✖".red().bold()),
    }
}
