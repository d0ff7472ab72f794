//! Application configuration types for Pitchbot.
//!
//! `AppConfig` represents the top-level `config.toml` that controls the
//! language model, the speech adapters, and the REST server.

use serde::{Deserialize, Serialize};

use crate::llm::GenerationSettings;
use crate::speech::CaptureSettings;

/// Top-level configuration.
///
/// Loaded from `pitchbot.toml` or `~/.pitchbot/config.toml`. All fields have
/// sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Language-model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Gemini model used for both extraction and chat.
    pub model: String,
    /// Base URL of the Generative Language API.
    pub base_url: String,
    /// Output token budget per call.
    pub max_tokens: u32,
    /// Sampling temperature; `None` leaves the model default.
    pub temperature: Option<f64>,
    /// Environment variable holding the default API key.
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_tokens: 8192,
            temperature: None,
            api_key_env: "GOOGLE_GEMINI_API_KEY".to_string(),
        }
    }
}

impl From<&LlmConfig> for GenerationSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Speech recognition, synthesis and capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Base URL of the Cloud Speech-to-Text API.
    pub recognizer_base_url: String,
    /// BCP-47 language used for recognition.
    pub recognizer_language: String,
    /// Environment variable holding a dedicated speech key; falls back to the LLM key.
    pub recognizer_api_key_env: String,
    /// Host serving the translate TTS endpoint.
    pub tts_base_url: String,
    /// Language used for synthesis.
    pub tts_language: String,
    /// Slow speaking rate.
    pub tts_slow: bool,
    pub capture: CaptureSettings,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            recognizer_base_url: "https://speech.googleapis.com".to_string(),
            recognizer_language: "en-US".to_string(),
            recognizer_api_key_env: "GOOGLE_SPEECH_API_KEY".to_string(),
            tts_base_url: "https://translate.google.com".to_string(),
            tts_language: "en".to_string(),
            tts_slow: false,
            capture: CaptureSettings::default(),
        }
    }
}

/// REST server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds a REST session may sit unused before it is dropped. 0 keeps sessions forever.
    pub session_idle_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            session_idle_secs: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.llm.api_key_env, "GOOGLE_GEMINI_API_KEY");
        assert_eq!(config.speech.tts_language, "en");
        assert!(!config.speech.tts_slow);
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.server.session_idle_secs, 3600);
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.llm.max_tokens, 8192);
        assert_eq!(config.speech.recognizer_language, "en-US");
        assert_eq!(config.speech.capture.wait_timeout_ms, 5_000);
    }

    #[test]
    fn test_app_config_deserialize_with_values() {
        let toml_str = r#"
[llm]
model = "gemini-2.0-flash"
temperature = 0.4

[speech]
tts_slow = true

[speech.capture]
phrase_limit_ms = 15000

[server]
port = 9000
session_idle_secs = 0
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, "gemini-2.0-flash");
        assert_eq!(config.llm.temperature, Some(0.4));
        assert_eq!(config.llm.base_url, "https://generativelanguage.googleapis.com");
        assert!(config.speech.tts_slow);
        assert_eq!(config.speech.capture.phrase_limit_ms, 15_000);
        assert_eq!(config.speech.capture.calibration_ms, 500);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.session_idle_secs, 0);
    }

    #[test]
    fn test_generation_settings_from_llm_config() {
        let settings = GenerationSettings::from(&LlmConfig::default());
        assert_eq!(settings.model, "gemini-2.5-flash");
        assert_eq!(settings.max_tokens, 8192);
        assert!(settings.temperature.is_none());
    }
}
