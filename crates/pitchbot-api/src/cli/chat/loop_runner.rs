//! Main chat loop orchestration.
//!
//! Setup (API key, company, website) runs through `dialoguer` prompts; the
//! live chat reads lines with `rustyline_async`. `/reset` drops the line
//! reader, returns the session to Setup and runs the prompts again.

use console::style;
use dialoguer::{Input, Password};

use pitchbot_core::session::context::SessionContext;
use pitchbot_core::speech::AudioSource;
use pitchbot_infra::audio::MicrophoneCapture;
use pitchbot_types::error::SessionError;
use pitchbot_types::profile::CompanyRequest;
use pitchbot_types::speech::AudioClip;

use crate::cli::playback;
use crate::state::{AppState, ConcreteChatbotService};

use super::banner::print_company_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::{ChatRenderer, spinner};

/// What the live loop wants next.
enum LoopExit {
    Quit,
    Reset,
}

/// Run the interactive chat until the user exits.
pub async fn run_chat_loop(
    state: &AppState,
    company: Option<String>,
    website: Option<String>,
) -> anyhow::Result<()> {
    let chatbot = state.chatbot.as_ref();
    let mut ctx = chatbot.new_session();
    let mut preset = (company, website);

    loop {
        ensure_credential(chatbot, &mut ctx)?;
        let (company, website) = std::mem::take(&mut preset);
        if !launch(state, &mut ctx, company, website).await? {
            return Ok(());
        }

        match run_live(state, &mut ctx).await? {
            LoopExit::Quit => break,
            LoopExit::Reset => {
                chatbot.reset(&mut ctx);
                println!("\n  {}\n", style("Chatbot reset.").dim());
            }
        }
    }

    println!("\n  {}", style("Session ended.").dim());
    Ok(())
}

/// Prompt for an API key when neither the environment nor the session has one.
fn ensure_credential(chatbot: &ConcreteChatbotService, ctx: &mut SessionContext) -> anyhow::Result<()> {
    if ctx.has_credential() {
        println!("  {} API key loaded!", style("✓").green().bold());
        return Ok(());
    }
    println!(
        "  {} Get a free key at {}",
        style("i").blue().bold(),
        style("https://aistudio.google.com/app/apikey").cyan()
    );
    loop {
        let key = Password::new()
            .with_prompt("Enter Gemini API Key")
            .allow_empty_password(true)
            .interact()?;
        match chatbot.set_credential(ctx, &key) {
            Ok(()) => return Ok(()),
            Err(_) => println!("  {} {}", style("!").yellow().bold(), SessionError::MissingCredential),
        }
    }
}

/// Collect company details and launch. Returns false when the user quits.
///
/// Values passed on the command line are used for the first attempt only.
async fn launch(
    state: &AppState,
    ctx: &mut SessionContext,
    mut company: Option<String>,
    mut website: Option<String>,
) -> anyhow::Result<bool> {
    loop {
        let name = match company.take() {
            Some(name) => name,
            None => Input::<String>::new()
                .with_prompt("Company Name")
                .allow_empty(true)
                .interact_text()?,
        };
        let site = match website.take() {
            Some(site) => site,
            None => Input::<String>::new()
                .with_prompt("Website")
                .allow_empty(true)
                .interact_text()?,
        };
        if name.trim().is_empty() && site.trim().is_empty() {
            let quit = dialoguer::Confirm::new()
                .with_prompt("Nothing entered. Quit?")
                .default(true)
                .interact()?;
            if quit {
                return Ok(false);
            }
            continue;
        }

        let progress = spinner("Setting up...");
        let result = state
            .chatbot
            .launch(ctx, &CompanyRequest::new(name, site))
            .await;
        progress.finish_and_clear();

        match result {
            Ok(outcome) => {
                if let Some(notice) = &outcome.notice {
                    println!("  {} {notice}", style("!").red().bold());
                }
                return Ok(true);
            }
            Err(SessionError::InvalidInput(msg)) => {
                println!("  {} {msg}", style("!").red().bold());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// The live chat: read lines until exit or reset.
async fn run_live(state: &AppState, ctx: &mut SessionContext) -> anyhow::Result<LoopExit> {
    let chatbot = state.chatbot.as_ref();
    let Some(profile) = ctx.profile().cloned() else {
        return Ok(LoopExit::Reset);
    };
    let renderer = ChatRenderer::new(&profile.company_name);

    print_company_banner(&profile, &chatbot.settings().model, &ctx.id().to_string());
    for turn in ctx.transcript() {
        renderer.print_turn(turn);
    }
    println!();

    let mut input =
        ChatInput::new().map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        match input.next_event().await {
            InputEvent::Eof => return Ok(LoopExit::Quit),
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
            }
            InputEvent::Message(text) => {
                let progress = spinner("Thinking...");
                let exchange = chatbot.send_text(ctx, &text).await;
                progress.finish_and_clear();
                match exchange {
                    Ok(exchange) => renderer.print_turn(&exchange.assistant),
                    Err(e) => print_error(&e),
                }
                println!();
            }
            InputEvent::Command(command) => match command {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => input.clear(),
                ChatCommand::Exit => return Ok(LoopExit::Quit),
                ChatCommand::Reset => return Ok(LoopExit::Reset),
                ChatCommand::History => renderer.print_history(ctx.transcript()),
                ChatCommand::Sound => {
                    chatbot.enable_sound(ctx);
                    println!("\n  {} Sound enabled! Voice chat ready.\n", style("✓").green().bold());
                }
                ChatCommand::Voice => voice_turn(state, ctx, &renderer).await,
                ChatCommand::Replay => match chatbot.replay(ctx).await {
                    Ok(Some(clip)) => play(clip).await,
                    Ok(None) => {}
                    Err(e) => print_error(&e),
                },
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            },
        }
    }
}

/// Capture one utterance, answer it, and speak the answer.
async fn voice_turn(state: &AppState, ctx: &mut SessionContext, renderer: &ChatRenderer) {
    let chatbot = state.chatbot.as_ref();
    if let Err(e) = chatbot.ensure_voice_ready(ctx) {
        print_error(&e);
        return;
    }

    println!("\n  {} Listening... Speak now!", style("🎤").bold());
    let settings = state.config.speech.capture.clone();
    let captured =
        tokio::task::spawn_blocking(move || MicrophoneCapture::new().capture(&settings)).await;
    let audio = match captured {
        Ok(Ok(audio)) => audio,
        Ok(Err(e)) => return print_error(&SessionError::Speech(e)),
        Err(e) => {
            tracing::warn!(error = %e, "capture task failed");
            return;
        }
    };

    let progress = spinner("Processing...");
    let result = chatbot.send_voice(ctx, &audio).await;
    progress.finish_and_clear();

    match result {
        Ok(voice) => {
            println!("\n  {} {}", style("You:").green().bold(), style(&voice.heard).bold());
            renderer.print_turn(&voice.exchange.assistant);
            println!();
            if let Some(clip) = voice.audio {
                play(clip).await;
            }
        }
        Err(e) => print_error(&e),
    }
}

async fn play(clip: AudioClip) {
    let progress = spinner("Speaking...");
    let result = playback::play(clip).await;
    progress.finish_and_clear();
    if let Err(e) = result {
        tracing::debug!(error = %e, "playback failed");
    }
}

fn print_error(err: &SessionError) {
    println!("\n  {} {err}\n", style("!").red().bold());
}
