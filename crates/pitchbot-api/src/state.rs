//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and the
//! REST API. `ChatbotService` is generic over its provider factory and speech
//! adapters; AppState pins it to the Google-backed infra implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pitchbot_core::session::service::ChatbotService;
use pitchbot_core::session::store::SessionStore;
use pitchbot_infra::config::{load_app_config, resolve_data_dir};
use pitchbot_infra::llm::GeminiProviderFactory;
use pitchbot_infra::secret::{EnvCredentialSource, load_dotenv};
use pitchbot_infra::speech::{GoogleSpeechRecognizer, GoogleTranslateTts};
use pitchbot_types::config::AppConfig;
use pitchbot_types::llm::GenerationSettings;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteChatbotService =
    ChatbotService<GeminiProviderFactory, GoogleSpeechRecognizer, GoogleTranslateTts>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chatbot: Arc<ConcreteChatbotService>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load `.env` and the config file, then wire the services.
    pub async fn init(config_path: Option<&Path>) -> anyhow::Result<Self> {
        load_dotenv();
        let data_dir = resolve_data_dir();
        let config = load_app_config(config_path, &data_dir).await;
        Self::from_config(config, data_dir)
    }

    /// Wire the services for an already-loaded configuration.
    pub fn from_config(config: AppConfig, data_dir: PathBuf) -> anyhow::Result<Self> {
        let llm_key = EnvCredentialSource::new(&config.llm.api_key_env);
        let speech_key = EnvCredentialSource::new(&config.speech.recognizer_api_key_env);

        let default_credential = llm_key.get();
        if default_credential.is_none() {
            tracing::info!(
                var = %llm_key.var(),
                "no default API key in the environment; sessions must supply one"
            );
        }

        let recognizer = GoogleSpeechRecognizer::new(&config.speech, speech_key.get_or(&llm_key))?;
        let synthesizer = GoogleTranslateTts::new(&config.speech)?;

        let chatbot = ChatbotService::new(
            GeminiProviderFactory::new(&config.llm),
            recognizer,
            synthesizer,
            GenerationSettings::from(&config.llm),
            default_credential,
        );

        Ok(Self {
            chatbot: Arc::new(chatbot),
            sessions: Arc::new(SessionStore::new()),
            config: Arc::new(config),
            data_dir,
        })
    }

    /// Periodically drop REST sessions idle longer than `[server] session_idle_secs`.
    ///
    /// Does nothing when the timeout is 0.
    pub fn spawn_session_sweeper(&self) {
        let idle_secs = self.config.server.session_idle_secs;
        if idle_secs == 0 {
            return;
        }
        let max_idle = Duration::from_secs(idle_secs);
        let period = Duration::from_secs(idle_secs.clamp(1, 60));
        let sessions = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                sessions.sweep_idle(max_idle);
            }
        });
    }
}
