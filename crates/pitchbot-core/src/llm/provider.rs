//! LlmProvider trait definition.
//!
//! This is the core abstraction that every language-model backend implements.
//! Uses RPITIT for `complete`; dynamic dispatch goes through `BoxLlmProvider`.

use secrecy::SecretString;

use pitchbot_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::box_provider::BoxLlmProvider;

/// Trait for LLM provider backends (Gemini, test fakes, ...).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in pitchbot-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}

/// Builds a provider bound to one credential.
///
/// Sessions carry their own API key, so the provider is created when the
/// session launches rather than once per process.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, api_key: &SecretString) -> Result<BoxLlmProvider, LlmError>;
}
