//! Slash commands available in the chat loop.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Record one utterance from the microphone and answer it aloud.
    Voice,
    /// Speak the last assistant reply again.
    Replay,
    /// Allow audio output and voice input.
    Sound,
    /// Drop the company and start over from setup.
    Reset,
    History,
    Clear,
    Exit,
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }
    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    Some(match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/voice" | "/v" | "/speak" => ChatCommand::Voice,
        "/replay" | "/r" => ChatCommand::Replay,
        "/sound" => ChatCommand::Sound,
        "/reset" => ChatCommand::Reset,
        "/history" => ChatCommand::History,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        _ => ChatCommand::Unknown(cmd),
    })
}

const HELP: &[(&str, &str)] = &[
    ("/help", "Show this help message"),
    ("/sound", "Enable sound (needed once before voice chat)"),
    ("/voice", "Speak a message; the reply is read aloud"),
    ("/replay", "Read the last reply aloud again"),
    ("/history", "Show the conversation so far"),
    ("/reset", "Forget this company and set up a new one"),
    ("/clear", "Clear the screen"),
    ("/exit", "End the chat"),
];

pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (name, description) in HELP {
        println!("  {:<10} {description}", style(name).cyan());
    }
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
