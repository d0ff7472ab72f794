//! `pitchbot profile`: build a company profile without starting a chat.

use console::style;

use pitchbot_types::profile::CompanyRequest;

use crate::state::AppState;

/// Extract the profile for `company` and print it.
///
/// With `--json` the whole launch outcome (profile plus any fallback notice)
/// is printed; otherwise the profile alone is pretty-printed and the notice
/// goes to stderr.
pub async fn show_profile(
    state: &AppState,
    company: &str,
    website: &str,
    json: bool,
) -> anyhow::Result<()> {
    let mut ctx = state.chatbot.new_session();
    let request = CompanyRequest::new(company, website);

    let spinner = super::chat::renderer::spinner("Setting up...");
    let outcome = state.chatbot.launch(&mut ctx, &request).await;
    spinner.finish_and_clear();
    let outcome = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if let Some(notice) = &outcome.notice {
        eprintln!("  {} Using fallback profile ({notice})", style("!").yellow().bold());
    }
    println!("{}", serde_json::to_string_pretty(&outcome.profile)?);
    Ok(())
}
