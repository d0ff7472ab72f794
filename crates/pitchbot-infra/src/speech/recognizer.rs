//! GoogleSpeechRecognizer -- [`SpeechRecognizer`] over Cloud Speech-to-Text.
//!
//! Sends 16-bit mono PCM as base64 `LINEAR16` to `/v1/speech:recognize`.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use pitchbot_core::speech::SpeechRecognizer;
use pitchbot_types::config::SpeechConfig;
use pitchbot_types::speech::{CapturedAudio, SpeechError};

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'static str,
    sample_rate_hertz: u32,
    language_code: &'a str,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

impl RecognizeResponse {
    /// Best alternative of every result, joined.
    fn transcript(&self) -> String {
        self.results
            .iter()
            .filter_map(|r| r.alternatives.first())
            .map(|a| a.transcript.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Cloud Speech-to-Text client. The key is optional so the adapter can be
/// built before a key exists; recognition then fails with a service error.
pub struct GoogleSpeechRecognizer {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    language: String,
}

impl GoogleSpeechRecognizer {
    pub fn new(config: &SpeechConfig, api_key: Option<SecretString>) -> Result<Self, SpeechError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SpeechError::Service(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            base_url: config.recognizer_base_url.trim_end_matches('/').to_string(),
            language: config.recognizer_language.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/v1/speech:recognize", self.base_url)
    }
}

impl SpeechRecognizer for GoogleSpeechRecognizer {
    async fn recognize(&self, audio: &CapturedAudio) -> Result<String, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::Timeout);
        }
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| SpeechError::Service("no speech API key configured".to_string()))?;

        let body = RecognizeRequest {
            config: RecognitionConfig {
                encoding: "LINEAR16",
                sample_rate_hertz: audio.sample_rate,
                language_code: &self.language,
            },
            audio: RecognitionAudio {
                content: BASE64.encode(audio.to_le_bytes()),
            },
        };

        tracing::debug!(
            seconds = audio.duration().as_secs_f32(),
            language = %self.language,
            "speech recognize"
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Service(format!("recognition request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Service(format!(
                "recognition failed with HTTP {status}: {error_body}"
            )));
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Service(format!("failed to parse recognition response: {e}")))?;

        let transcript = parsed.transcript();
        if transcript.is_empty() {
            return Err(SpeechError::Unintelligible);
        }
        Ok(transcript)
    }
}
