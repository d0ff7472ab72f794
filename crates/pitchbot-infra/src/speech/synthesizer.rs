//! GoogleTranslateTts -- [`SpeechSynthesizer`] speaking the gTTS protocol.
//!
//! Google's translate TTS endpoint accepts at most 100 characters per
//! request, so text is split into chunks and the returned MP3 segments are
//! concatenated into one clip.

use std::time::Duration;

use pitchbot_core::speech::SpeechSynthesizer;
use pitchbot_types::config::SpeechConfig;
use pitchbot_types::speech::{AudioClip, SpeechError};

/// Per-request character limit of the endpoint.
pub const MAX_CHUNK_CHARS: usize = 100;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Sentences are kept whole where they fit; longer sentences break on
/// whitespace, and single words longer than the limit are cut.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in sentences(text) {
        if fits(&current, &sentence, max_chars) {
            append(&mut current, &sentence);
            continue;
        }
        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if sentence.chars().count() <= max_chars {
            current = sentence;
            continue;
        }
        for word in sentence.split_whitespace() {
            for piece in cut(word, max_chars) {
                if !fits(&current, &piece, max_chars) {
                    chunks.push(std::mem::take(&mut current));
                }
                append(&mut current, &piece);
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn fits(current: &str, next: &str, max_chars: usize) -> bool {
    let sep = usize::from(!current.is_empty());
    current.chars().count() + sep + next.chars().count() <= max_chars
}

fn append(current: &mut String, next: &str) {
    if !current.is_empty() {
        current.push(' ');
    }
    current.push_str(next);
}

/// Sentences with their terminating punctuation, whitespace-normalized.
fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        buf.push(c);
        let at_boundary = matches!(c, '.' | '!' | '?' | ';' | ':' | '\n')
            && chars.peek().is_none_or(|n| n.is_whitespace());
        if at_boundary {
            push_normalized(&mut out, &buf);
            buf.clear();
        }
    }
    push_normalized(&mut out, &buf);
    out
}

fn push_normalized(out: &mut Vec<String>, raw: &str) {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !normalized.is_empty() {
        out.push(normalized);
    }
}

fn cut(word: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(max_chars.max(1))
        .map(|c| c.iter().collect())
        .collect()
}

/// Translate-TTS client.
pub struct GoogleTranslateTts {
    client: reqwest::Client,
    base_url: String,
    language: String,
    slow: bool,
}

impl GoogleTranslateTts {
    pub fn new(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SpeechError::Service(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.tts_base_url.trim_end_matches('/').to_string(),
            language: config.tts_language.clone(),
            slow: config.tts_slow,
        })
    }

    fn speed(&self) -> &'static str {
        if self.slow { "0.3" } else { "1" }
    }

    async fn synthesize_part(&self, text: &str, idx: usize, total: usize) -> Result<Vec<u8>, SpeechError> {
        let textlen = text.chars().count().to_string();
        let idx = idx.to_string();
        let total = total.to_string();
        let response = self
            .client
            .get(format!("{}/translate_tts", self.base_url))
            .query(&[
                ("ie", "UTF-8"),
                ("q", text),
                ("tl", self.language.as_str()),
                ("ttsspeed", self.speed()),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("client", "tw-ob"),
                ("textlen", textlen.as_str()),
            ])
            .header("Referer", format!("{}/", self.base_url))
            .send()
            .await
            .map_err(|e| SpeechError::Service(format!("TTS request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Service(format!("TTS failed with HTTP {status}")));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Service(format!("failed to read TTS audio: {e}")))?;
        Ok(bytes.to_vec())
    }
}

impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(&self, text: &str) -> Result<AudioClip, SpeechError> {
        let parts = split_text(text, MAX_CHUNK_CHARS);
        if parts.is_empty() {
            return Err(SpeechError::Service("No text to speak".to_string()));
        }

        tracing::debug!(chunks = parts.len(), language = %self.language, "tts synthesize");

        let mut audio = Vec::new();
        for (idx, part) in parts.iter().enumerate() {
            audio.extend(self.synthesize_part(part, idx, parts.len()).await?);
        }
        Ok(AudioClip::mp3(audio))
    }
}
