//! Console output formatter for turns, creations and models

use codemax_application::TurnOutcome;
use codemax_domain::core::string::ellipsize;
use codemax_domain::{Creation, CreationId, Message, Model, Role, TurnPhase, extract_document};
use colored::Colorize;
use std::path::Path;

/// Formats chat state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One line per creation, most recent first, numbered from 1.
    ///
    /// The numbers are what `/select N` accepts.
    pub fn format_creations(creations: &[Creation], active: Option<CreationId>) -> String {
        if creations.is_empty() {
            return format!("{}\n", "No creations yet.".dimmed());
        }

        let mut output = Self::section_header("Creations");
        for (index, creation) in creations.iter().enumerate() {
            let marker = if Some(creation.id) == active {
                "*".green().bold().to_string()
            } else {
                " ".to_string()
            };
            output.push_str(&format!(
                "{} {:>2}. {}  {}\n",
                marker,
                index + 1,
                creation.name,
                creation
                    .created_at
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .dimmed()
            ));
        }
        output
    }

    /// The conversation, numbered from 1 as `/preview N` expects.
    ///
    /// Model messages holding a document are tagged `[html]`.
    pub fn format_messages(messages: &[Message]) -> String {
        if messages.is_empty() {
            return format!("{}\n", "No messages yet.".dimmed());
        }

        let mut output = Self::section_header("Messages");
        for (index, message) in messages.iter().enumerate() {
            let text = message.text();
            let first_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
            let role = match message.role {
                Role::User => "you".cyan(),
                Role::Model => message.model_label.as_deref().unwrap_or("model").magenta(),
            };
            let tag = if message.failed {
                " [failed]".red().to_string()
            } else if message.role == Role::Model && extract_document(&text).is_some() {
                " [html]".green().to_string()
            } else if message.attachment().is_some() {
                " [file]".dimmed().to_string()
            } else {
                String::new()
            };
            output.push_str(&format!(
                "{:>3}. {}{}: {}\n",
                index + 1,
                role,
                tag,
                ellipsize(first_line.trim(), 60)
            ));
        }
        output
    }

    /// Short summary printed after a turn
    pub fn format_turn_summary(outcome: &TurnOutcome, preview_dir: Option<&Path>) -> String {
        match outcome.phase {
            TurnPhase::Failed => format!(
                "{} {}\n",
                "Turn failed:".red().bold(),
                outcome.error.as_deref().unwrap_or("unknown error")
            ),
            _ => match &outcome.creation {
                Some(creation) => {
                    let mut output = format!(
                        "{} {} ({} bytes)\n",
                        "Active creation:".cyan().bold(),
                        creation.name,
                        creation.html.len()
                    );
                    if let Some(dir) = preview_dir {
                        output.push_str(&format!(
                            "{} {}\n",
                            "Preview:".cyan().bold(),
                            dir.join("current.html").display()
                        ));
                    }
                    output
                }
                None => format!("{}\n", "No HTML document in this response.".dimmed()),
            },
        }
    }

    /// Known models, marking the current one
    pub fn format_models(models: &[Model], current: &Model) -> String {
        let mut output = Self::section_header("Models");
        for model in models {
            let marker = if model == current { "*" } else { " " };
            output.push_str(&format!(
                "{} {:<14} {:<14} {:<24} {}\n",
                marker.green().bold(),
                model.key(),
                model.display_name(),
                model.backend_id().dimmed(),
                model.variant()
            ));
        }
        if !models.contains(current) {
            output.push_str(&format!(
                "{} {:<14} {}\n",
                "*".green().bold(),
                current.key(),
                "(custom backend id)".dimmed()
            ));
        }
        output
    }

    /// Section header line
    pub fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
