//! Speech payload and capture configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sample rate used for microphone capture and recognition (16 kHz).
pub const CAPTURE_SAMPLE_RATE: u32 = 16_000;

/// MIME type of synthesized speech.
pub const MP3_MIME: &str = "audio/mpeg";

/// Mono 16-bit PCM audio ready for recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl CapturedAudio {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Little-endian byte view of the samples (LINEAR16).
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Encoded audio returned by a synthesizer, positioned at its start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl AudioClip {
    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: MP3_MIME.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Limits applied while listening for a single utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Ambient-noise sampling window before listening starts.
    pub calibration_ms: u64,
    /// Maximum wait for speech to begin.
    pub wait_timeout_ms: u64,
    /// Maximum length of the utterance once it has started.
    pub phrase_limit_ms: u64,
    /// Silence that ends the utterance.
    pub pause_threshold_ms: u64,
    /// Multiplier applied to the ambient RMS to get the speech threshold.
    pub dynamic_energy_ratio: f32,
    /// Lowest speech threshold, in int16 RMS units.
    pub energy_floor: f32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            calibration_ms: 500,
            wait_timeout_ms: 5_000,
            phrase_limit_ms: 10_000,
            pause_threshold_ms: 800,
            dynamic_energy_ratio: 1.5,
            energy_floor: 300.0,
        }
    }
}

impl CaptureSettings {
    pub fn calibration(&self) -> Duration {
        Duration::from_millis(self.calibration_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn phrase_limit(&self) -> Duration {
        Duration::from_millis(self.phrase_limit_ms)
    }

    pub fn pause_threshold(&self) -> Duration {
        Duration::from_millis(self.pause_threshold_ms)
    }
}

/// Errors from speech capture, recognition or synthesis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("No speech detected")]
    Timeout,

    #[error("Could not understand")]
    Unintelligible,

    #[error("Error: {0}")]
    Device(String),

    #[error("Error: {0}")]
    Service(String),
}
