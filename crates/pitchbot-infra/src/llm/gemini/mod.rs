//! Google Gemini provider implementation.
//!
//! [`GeminiProvider`] implements
//! [`LlmProvider`](pitchbot_core::llm::provider::LlmProvider) for the
//! Generative Language `generateContent` endpoint.

pub mod client;
pub mod types;

pub use client::{GeminiProvider, GeminiProviderFactory};
