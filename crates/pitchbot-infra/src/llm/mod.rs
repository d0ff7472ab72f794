//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined in
//! `pitchbot-core`, plus the factory that binds it to a session credential.
//!
//! [`LlmProvider`]: pitchbot_core::llm::provider::LlmProvider

pub mod gemini;

pub use gemini::{GeminiProvider, GeminiProviderFactory};
