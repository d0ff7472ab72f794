//! Async line input for the chat loop.
//!
//! Lines starting with `/` come back as parsed commands; blank lines are
//! skipped inside `next_event`.

use console::style;
use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

use super::commands::{self, ChatCommand};

#[derive(Debug)]
pub enum InputEvent {
    /// A chat message for the assistant.
    Message(String),
    Command(ChatCommand),
    /// Ctrl+D.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

/// Readline wrapper owning the terminal while the chat is live.
///
/// Drop it before running blocking `dialoguer` prompts.
pub struct ChatInput {
    rl: Readline,
    _writer: SharedWriter,
}

impl ChatInput {
    pub fn new() -> Result<Self, ReadlineError> {
        let prompt = format!("  {} ", style("You >").green().bold());
        let (rl, writer) = Readline::new(prompt)?;
        Ok(Self {
            rl,
            _writer: writer,
        })
    }

    /// Wait for the next non-blank line or control event.
    pub async fn next_event(&mut self) -> InputEvent {
        loop {
            let line = match self.rl.readline().await {
                Ok(ReadlineEvent::Line(line)) => line,
                Ok(ReadlineEvent::Eof) | Err(_) => return InputEvent::Eof,
                Ok(ReadlineEvent::Interrupted) => return InputEvent::Interrupted,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.rl.add_history_entry(line.to_string());
            return match commands::parse(line) {
                Some(command) => InputEvent::Command(command),
                None => InputEvent::Message(line.to_string()),
            };
        }
    }

    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }
}
