//! MP3 playback on the default output device.

use std::io::Cursor;

use anyhow::Context;
use rodio::{Decoder, OutputStream, Sink};

use pitchbot_types::speech::AudioClip;

/// Play `clip` to completion. Blocks the calling thread.
pub fn play_blocking(clip: &AudioClip) -> anyhow::Result<()> {
    let (_stream, handle) = OutputStream::try_default().context("no audio output device")?;
    let sink = Sink::try_new(&handle).context("failed to open audio output")?;
    let source = Decoder::new(Cursor::new(clip.bytes.clone())).context("failed to decode MP3")?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

/// Play `clip` on the blocking pool.
pub async fn play(clip: AudioClip) -> anyhow::Result<()> {
    tokio::task::spawn_blocking(move || play_blocking(&clip)).await?
}
