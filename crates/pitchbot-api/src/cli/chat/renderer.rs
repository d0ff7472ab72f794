//! Terminal rendering for chat turns.
//!
//! Replies are rendered as markdown through `termimad`; failed turns are
//! printed as plain red text so they stand out from model output.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use termimad::MadSkin;
use termimad::crossterm::style::Color;

use pitchbot_types::chat::{ConversationTurn, MessageRole};

/// Steady spinner with `message`, cleared by the caller.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Markdown renderer for assistant replies.
pub struct ChatRenderer {
    skin: MadSkin,
    company: String,
}

impl ChatRenderer {
    pub fn new(company: impl Into<String>) -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self {
            skin,
            company: company.into(),
        }
    }

    /// Render a markdown reply for the terminal.
    pub fn render_final(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }

    /// Print one transcript entry, labelled with its speaker.
    pub fn print_turn(&self, turn: &ConversationTurn) {
        match turn.role {
            MessageRole::User => {
                println!("\n  {} {}", style("You:").green().bold(), turn.content);
            }
            _ if turn.failed => {
                println!(
                    "\n  {} {}",
                    style(format!("{}:", self.company)).cyan().bold(),
                    style(&turn.content).red()
                );
            }
            _ => {
                println!("\n  {}", style(format!("{}:", self.company)).cyan().bold());
                println!("  {}", self.render_final(&turn.content).trim());
            }
        }
    }

    /// Compact one-line listing used by `/history`.
    pub fn print_history(&self, transcript: &[ConversationTurn]) {
        println!();
        if transcript.is_empty() {
            println!("  {}", style("No messages yet.").dim());
        }
        for turn in transcript {
            let label = match turn.role {
                MessageRole::User => style("You".to_string()).green(),
                _ => style(self.company.clone()).cyan(),
            };
            println!("  {} {}", style(label).bold(), preview(&turn.content, 100));
        }
        println!();
    }
}

/// First `max` characters of `text`, with an ellipsis when cut.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{head}...")
}
