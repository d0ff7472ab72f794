//! Network speech adapters.
//!
//! - `recognizer`: Google Cloud Speech-to-Text (`speech:recognize`)
//! - `synthesizer`: Google Translate TTS (the gTTS protocol)

pub mod recognizer;
pub mod synthesizer;

pub use recognizer::GoogleSpeechRecognizer;
pub use synthesizer::GoogleTranslateTts;
