//! Infrastructure layer for Pitchbot.
//!
//! Implements the ports defined in `pitchbot-core`: the Gemini LLM provider,
//! Google speech recognition and translate-TTS synthesis, cpal microphone
//! capture and WAV decoding. Also loads configuration and credentials.

pub mod audio;
pub mod config;
pub mod llm;
pub mod secret;
pub mod speech;
