//! `pitchbot say`: speak text through the TTS adapter.

use std::path::Path;

use console::style;

use pitchbot_core::speech::SpeechSynthesizer;
use pitchbot_infra::speech::GoogleTranslateTts;

use crate::state::AppState;

/// Synthesize `text`, then write it to `out` or play it.
///
/// Unlike chat replies, a synthesis failure here is reported.
pub async fn say(state: &AppState, text: &str, out: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let tts = GoogleTranslateTts::new(&state.config.speech)?;
    let clip = tts.synthesize(text).await?;

    match out {
        Some(path) => {
            tokio::fs::write(path, &clip.bytes).await?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "path": path.display().to_string(), "bytes": clip.len() })
                );
            } else {
                println!(
                    "  {} Wrote {} bytes to {}",
                    style("✓").green().bold(),
                    clip.len(),
                    style(path.display()).cyan()
                );
            }
        }
        None => super::playback::play(clip).await?,
    }
    Ok(())
}
