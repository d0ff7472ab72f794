//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends requests to `/v1beta/models/{model}:generateContent`. The API key
//! travels in the `x-goog-api-key` header, never in the URL, so it cannot
//! leak through request logging.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use secrecy::{ExposeSecret, SecretString};

use pitchbot_core::llm::box_provider::BoxLlmProvider;
use pitchbot_core::llm::provider::{LlmProvider, ProviderFactory};
use pitchbot_types::config::LlmConfig;
use pitchbot_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, Usage,
};

use super::types::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};

/// Default public endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini LLM provider.
///
/// Does not derive `Debug`; the key is a [`SecretString`] and only exposed
/// when building request headers.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: SecretString, model: String) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// Convert a generic [`CompletionRequest`] into a Gemini request body.
    ///
    /// Assistant turns use Gemini's `model` role; system messages are folded
    /// into `systemInstruction`.
    fn to_gemini_request(&self, request: &CompletionRequest) -> GenerateContentRequest {
        let mut system = request.system.clone();
        let mut contents = Vec::with_capacity(request.messages.len());
        for message in &request.messages {
            match message.role {
                MessageRole::User => contents.push(Content::text(Some("user"), &message.content)),
                MessageRole::Assistant => {
                    contents.push(Content::text(Some("model"), &message.content))
                }
                MessageRole::System => {
                    let merged = match system.take() {
                        Some(existing) => format!("{existing}\n\n{}", message.content),
                        None => message.content.clone(),
                    };
                    system = Some(merged);
                }
            }
        }

        GenerateContentRequest {
            contents,
            system_instruction: system.map(|text| Content::text(None, text)),
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        }
    }

    fn map_status(status: reqwest::StatusCode, retry_after: Option<u64>, body: &str) -> LlmError {
        let detail = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error)
            .ok();
        let message = detail
            .as_ref()
            .map(|d| d.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.to_string());

        match status.as_u16() {
            401 | 403 => LlmError::AuthenticationFailed,
            // An invalid key comes back as 400 INVALID_ARGUMENT.
            400 if message.contains("API key") => LlmError::AuthenticationFailed,
            400 => LlmError::InvalidRequest(message),
            429 => LlmError::RateLimited {
                retry_after_ms: retry_after.map(|secs| secs * 1000),
            },
            503 => LlmError::Overloaded(message),
            _ => LlmError::Provider {
                message: format!(
                    "HTTP {status}: {}",
                    detail.map(|d| d.status).filter(|s| !s.is_empty()).unwrap_or(message)
                ),
            },
        }
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        let body = self.to_gemini_request(request);

        tracing::debug!(model, messages = body.contents.len(), "gemini generateContent");

        let response = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::map_status(status, retry_after, &error_body));
        }

        let gemini_resp: GenerateContentResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let content = gemini_resp.text();
        if content.is_empty() {
            if let Some(reason) = gemini_resp
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
            {
                return Err(LlmError::Provider {
                    message: format!("prompt blocked: {reason}"),
                });
            }
            return Err(LlmError::EmptyResponse);
        }

        let usage = gemini_resp
            .usage_metadata
            .as_ref()
            .map(|u| Usage {
                input_tokens: u.prompt_token_count.unwrap_or(0),
                output_tokens: u.candidates_token_count.unwrap_or(0),
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: gemini_resp
                .model_version
                .clone()
                .unwrap_or_else(|| model.to_string()),
            finish_reason: gemini_resp
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone()),
            usage,
        })
    }
}

/// Builds a [`GeminiProvider`] per session credential from [`LlmConfig`].
#[derive(Debug, Clone)]
pub struct GeminiProviderFactory {
    model: String,
    base_url: String,
}

impl GeminiProviderFactory {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

impl ProviderFactory for GeminiProviderFactory {
    fn create(&self, api_key: &SecretString) -> Result<BoxLlmProvider, LlmError> {
        let key = SecretString::from(api_key.expose_secret().to_owned());
        let provider = GeminiProvider::new(key, self.model.clone())?.with_base_url(&self.base_url);
        Ok(BoxLlmProvider::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchbot_types::llm::Message;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn make_provider(base_url: &str) -> GeminiProvider {
        GeminiProvider::new(
            SecretString::from("test-key-not-real"),
            "gemini-2.5-flash".to_string(),
        )
        .unwrap()
        .with_base_url(base_url)
    }

    fn request(messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest {
            model: "gemini-2.5-flash".to_string(),
            messages,
            system: None,
            max_tokens: 512,
            temperature: Some(0.3),
        }
    }

    #[test]
    fn test_provider_name_and_url() {
        let provider = make_provider("http://localhost:8080/");
        assert_eq!(provider.name(), "gemini");
        assert_eq!(
            provider.url("gemini-2.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_to_gemini_request_maps_roles() {
        let provider = make_provider(GEMINI_BASE_URL);
        let mut req = request(vec![
            Message::user("hi"),
            Message::assistant("hello"),
            Message::user("again"),
        ]);
        req.system = Some("Be brief".to_string());

        let body = provider.to_gemini_request(&req);
        let roles: Vec<_> = body
            .contents
            .iter()
            .map(|c| c.role.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(roles, ["user", "model", "user"]);
        assert_eq!(
            body.system_instruction.unwrap().parts[0].text.as_deref(),
            Some("Be brief")
        );
        assert_eq!(body.generation_config.max_output_tokens, 512);
    }

    #[tokio::test]
    async fn test_complete_parses_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "test-key-not-real"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "Hello"}]}],
                "generationConfig": {"maxOutputTokens": 512, "temperature": 0.3}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Hi there!"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 4},
                "modelVersion": "gemini-2.5-flash-001"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = make_provider(&server.uri());
        let response = provider.complete(&request(vec![Message::user("Hello")])).await.unwrap();
        assert_eq!(response.content, "Hi there!");
        assert_eq!(response.model, "gemini-2.5-flash-001");
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.usage.input_tokens, 3);
        assert_eq!(response.usage.output_tokens, 4);
    }

    #[tokio::test]
    async fn test_complete_uses_provider_model_when_request_is_blank() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = make_provider(&server.uri());
        let req = CompletionRequest::with_messages(vec![Message::user("ping")]);
        let response = provider.complete(&req).await.unwrap();
        assert_eq!(response.model, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_invalid_key_maps_to_authentication_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .mount(&server)
            .await;

        let err = make_provider(&server.uri())
            .complete(&request(vec![Message::user("Hello")]))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let err = make_provider(&server.uri())
            .complete(&request(vec![Message::user("Hello")]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LlmError::RateLimited {
                retry_after_ms: Some(7000)
            }
        ));
    }

    #[tokio::test]
    async fn test_server_error_and_overload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}
            })))
            .mount(&server)
            .await;

        let err = make_provider(&server.uri())
            .complete(&request(vec![Message::user("Hello")]))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Overloaded(ref m) if m == "The model is overloaded."));
    }

    #[tokio::test]
    async fn test_blocked_prompt_and_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = make_provider(&server.uri())
            .complete(&request(vec![Message::user("Hello")]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "provider error: prompt blocked: SAFETY");
    }

    #[tokio::test]
    async fn test_factory_builds_provider_for_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-goog-api-key", "session-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = LlmConfig {
            base_url: server.uri(),
            ..LlmConfig::default()
        };
        let provider = GeminiProviderFactory::new(&config)
            .create(&SecretString::from("session-key"))
            .unwrap();
        assert_eq!(provider.name(), "gemini");
        let response = provider
            .complete(&CompletionRequest::with_messages(vec![Message::user("hi")]))
            .await
            .unwrap();
        assert_eq!(response.content, "ok");
    }
}
