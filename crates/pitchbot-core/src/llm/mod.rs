//! LLM provider abstractions for Pitchbot.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: object-safe wrapper for dynamic dispatch
//! - `ProviderFactory`: builds a provider for a session's credential

pub mod box_provider;
pub mod provider;

#[cfg(test)]
pub(crate) mod testing;
