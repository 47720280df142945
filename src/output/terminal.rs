//! Terminal renderer: styled flowing text.

use colored::Colorize;

use crate::models::{Evaluation, Role};
use crate::output::OutputRenderer;

/// Longest comment body excerpt shown in the thread listing.
const EXCERPT_LEN: usize = 72;

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render(&self, evaluation: &Evaluation) -> String {
        let actionable = match evaluation {
            Evaluation::Skipped(reason) => {
                return format!(" {} {}\n", "⏭ skipped:".yellow().bold(), reason);
            }
            Evaluation::Actionable(actionable) => actionable,
        };

        let mut output = String::new();
        output.push_str(&format!(" {}\n\n", "✔ actionable".green().bold()));

        output.push_str(&format!(" {}\n", "thread".bold()));
        for comment in &actionable.thread {
            output.push_str(&format!(
                "   #{} {}  {}\n",
                comment.id,
                comment.user.login.cyan(),
                excerpt(&comment.body).dimmed()
            ));
        }

        output.push_str(&format!(
            "\n {} {}\n",
            "fragment".bold(),
            format!("(from #{})", actionable.suggestion_id).dimmed()
        ));
        for line in actionable.fragment.lines() {
            output.push_str(&format!("   {} {line}\n", "│".dimmed()));
        }

        output.push_str(&format!("\n {}\n", "messages".bold()));
        for message in &actionable.messages {
            let role = match message.role {
                Role::System => "system".magenta().to_string(),
                Role::User => "user".blue().to_string(),
                Role::Assistant => "assistant".green().to_string(),
            };
            output.push_str(&format!("   [{role}] {}\n", excerpt(&message.content)));
        }

        output.push_str(&format!("{}\n", "───────────────────────────────────".dimmed()));
        output.push_str(&format!(
            " {} comments, {} messages\n",
            actionable.thread.len().to_string().bold(),
            actionable.messages.len().to_string().bold()
        ));

        output
    }
}

/// First line of `text`, shortened to [`EXCERPT_LEN`] characters.
fn excerpt(text: &str) -> String {
    let first = text.lines().next().unwrap_or_default();
    let mut short: String = first.chars().take(EXCERPT_LEN).collect();
    if first.chars().count() > EXCERPT_LEN || text.lines().nth(1).is_some() {
        short.push('…');
    }
    short
}
