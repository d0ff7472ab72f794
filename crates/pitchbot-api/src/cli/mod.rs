//! CLI command definitions for the `pitchbot` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod playback;
pub mod profile;
pub mod say;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with an AI assistant that impersonates any company, by text or voice.
#[derive(Parser)]
#[command(name = "pitchbot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a config file (defaults to ./pitchbot.toml, then ~/.pitchbot/config.toml).
    #[arg(long, global = true, env = "PITCHBOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat in the terminal.
    Chat {
        /// Company to impersonate (prompted when omitted).
        #[arg(long)]
        company: Option<String>,

        /// Company website (prompted when omitted).
        #[arg(long)]
        website: Option<String>,
    },

    /// Build a company profile and print it as JSON.
    Profile {
        #[arg(long)]
        company: String,

        #[arg(long)]
        website: String,
    },

    /// Speak a piece of text, or save it as MP3.
    Say {
        /// Text to synthesize.
        text: String,

        /// Write the MP3 here instead of playing it.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on (overrides the config file).
        #[arg(long, short)]
        port: Option<u16>,

        /// Host to bind to (overrides the config file).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
