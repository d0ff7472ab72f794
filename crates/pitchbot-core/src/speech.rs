//! Speech ports.
//!
//! Recognition and synthesis are network calls and therefore async.
//! Capture talks to an audio device and blocks; async callers should run it
//! on `tokio::task::spawn_blocking`.

use std::future::Future;

use pitchbot_types::speech::{AudioClip, CaptureSettings, CapturedAudio, SpeechError};

/// Turns captured audio into text.
pub trait SpeechRecognizer: Send + Sync {
    fn recognize(
        &self,
        audio: &CapturedAudio,
    ) -> impl Future<Output = Result<String, SpeechError>> + Send;
}

/// Turns text into playable audio.
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(&self, text: &str) -> impl Future<Output = Result<AudioClip, SpeechError>> + Send;
}

/// Records a single utterance from an input device.
pub trait AudioSource: Send + Sync {
    fn capture(&self, settings: &CaptureSettings) -> Result<CapturedAudio, SpeechError>;
}
