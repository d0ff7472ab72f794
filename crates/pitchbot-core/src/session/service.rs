//! ChatbotService -- the flow controller for a single session.
//!
//! Every operation takes the session's `SessionContext` explicitly. The
//! service itself is stateless apart from its collaborators, so one instance
//! serves every session in the process.

use secrecy::{ExposeSecret, SecretString};

use pitchbot_types::chat::{ChatReply, ConversationTurn, Exchange};
use pitchbot_types::error::SessionError;
use pitchbot_types::llm::GenerationSettings;
use pitchbot_types::profile::CompanyRequest;
use pitchbot_types::session::{LaunchOutcome, SessionSnapshot};
use pitchbot_types::speech::{AudioClip, CapturedAudio};

use super::context::{ActiveChat, SessionContext};
use crate::chat::conversation::Conversation;
use crate::chat::responder;
use crate::llm::provider::ProviderFactory;
use crate::profile::extractor::ProfileExtractor;
use crate::speech::{SpeechRecognizer, SpeechSynthesizer};

/// Result of a voice turn: what was heard, the exchange it produced, and
/// the spoken reply when synthesis succeeded.
#[derive(Debug, Clone)]
pub struct VoiceExchange {
    pub heard: String,
    pub exchange: Exchange,
    pub audio: Option<AudioClip>,
}

/// Drives sessions from Setup to Active and runs chat turns.
pub struct ChatbotService<F, R, S> {
    factory: F,
    recognizer: R,
    synthesizer: S,
    extractor: ProfileExtractor,
    settings: GenerationSettings,
    default_credential: Option<SecretString>,
}

impl<F, R, S> ChatbotService<F, R, S>
where
    F: ProviderFactory,
    R: SpeechRecognizer,
    S: SpeechSynthesizer,
{
    pub fn new(
        factory: F,
        recognizer: R,
        synthesizer: S,
        settings: GenerationSettings,
        default_credential: Option<SecretString>,
    ) -> Self {
        Self {
            factory,
            recognizer,
            synthesizer,
            extractor: ProfileExtractor::new(settings.clone()),
            settings,
            default_credential,
        }
    }

    /// A fresh Setup session using the process default credential.
    pub fn new_session(&self) -> SessionContext {
        SessionContext::new(self.default_credential())
    }

    fn default_credential(&self) -> Option<SecretString> {
        self.default_credential
            .as_ref()
            .map(|key| SecretString::from(key.expose_secret().to_owned()))
    }

    pub fn enable_sound(&self, ctx: &mut SessionContext) {
        ctx.allow_audio();
        tracing::debug!(session_id = %ctx.id(), "sound enabled");
    }

    /// Override the session's API key.
    pub fn set_credential(&self, ctx: &mut SessionContext, api_key: &str) -> Result<(), SessionError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(SessionError::InvalidInput("API key must not be blank".to_string()));
        }
        ctx.set_credential(SecretString::from(api_key.to_owned()));
        tracing::info!(session_id = %ctx.id(), "session credential replaced");
        Ok(())
    }

    /// Extract the company profile and move the session to Active.
    ///
    /// Extraction failures are not errors: the placeholder profile is used and
    /// the outcome carries a notice.
    #[tracing::instrument(name = "launch", skip_all, fields(session_id = %ctx.id(), company = %request.company_name))]
    pub async fn launch(
        &self,
        ctx: &mut SessionContext,
        request: &CompanyRequest,
    ) -> Result<LaunchOutcome, SessionError> {
        if ctx.is_active() {
            return Err(SessionError::AlreadyConfigured);
        }
        let credential = ctx.credential().ok_or(SessionError::MissingCredential)?;
        if !request.is_complete() {
            return Err(SessionError::InvalidInput("Fill both fields".to_string()));
        }

        let provider = self.factory.create(credential)?;
        let extraction = self
            .extractor
            .extract(&provider, &request.company_name, &request.website)
            .await;

        let profile = extraction.profile;
        let conversation = Conversation::start(self.settings.clone());
        ctx.activate(ActiveChat::new(profile.clone(), conversation, provider));
        tracing::info!(
            provider = ctx.active().map(|chat| chat.provider.name()).unwrap_or_default(),
            fallback = extraction.notice.is_some(),
            "chatbot launched"
        );

        Ok(LaunchOutcome {
            profile,
            notice: extraction.notice,
        })
    }

    /// Append the user's message and the assistant's reply.
    ///
    /// Always appends exactly two turns; a failed model call becomes an
    /// assistant turn flagged `failed`.
    pub async fn send_text(
        &self,
        ctx: &mut SessionContext,
        text: &str,
    ) -> Result<Exchange, SessionError> {
        if text.is_empty() {
            return Err(SessionError::InvalidInput("Message must not be empty".to_string()));
        }
        let chat = ctx.active_mut().ok_or(SessionError::NotConfigured)?;

        let user = ConversationTurn::user(text);
        chat.push(user.clone());

        let reply: ChatReply =
            responder::respond(&chat.provider, &mut chat.conversation, &chat.profile, text).await;
        let assistant = ConversationTurn::from_reply(&reply);
        chat.push(assistant.clone());

        Ok(Exchange {
            user,
            assistant,
            reply,
        })
    }

    /// Recognize `audio`, run it as a text turn, then speak the reply.
    ///
    /// Recognition failures leave the transcript untouched.
    pub async fn send_voice(
        &self,
        ctx: &mut SessionContext,
        audio: &CapturedAudio,
    ) -> Result<VoiceExchange, SessionError> {
        self.ensure_voice_ready(ctx)?;

        let heard = self.recognizer.recognize(audio).await.inspect_err(|e| {
            tracing::info!(session_id = %ctx.id(), error = %e, "speech not recognized");
        })?;
        let exchange = self.send_text(ctx, &heard).await?;
        let audio = self.speak(&exchange.assistant.content).await;

        Ok(VoiceExchange {
            heard,
            exchange,
            audio,
        })
    }

    /// Check the voice preconditions before a caller opens the microphone.
    pub fn ensure_voice_ready(&self, ctx: &SessionContext) -> Result<(), SessionError> {
        if !ctx.is_active() {
            return Err(SessionError::NotConfigured);
        }
        if !ctx.audio_allowed() {
            return Err(SessionError::SoundDisabled);
        }
        Ok(())
    }

    /// Re-synthesize the last assistant reply.
    pub async fn replay(&self, ctx: &SessionContext) -> Result<Option<AudioClip>, SessionError> {
        let chat = ctx.active().ok_or(SessionError::NotConfigured)?;
        let text = chat
            .last_assistant_reply()
            .ok_or(SessionError::NothingToReplay)?
            .to_owned();
        Ok(self.speak(&text).await)
    }

    /// Synthesize `text`, swallowing failures.
    pub async fn speak(&self, text: &str) -> Option<AudioClip> {
        match self.synthesizer.synthesize(text).await {
            Ok(clip) => Some(clip),
            Err(e) => {
                tracing::debug!(error = %e, "speech synthesis failed");
                None
            }
        }
    }

    /// Return the session to a fresh Setup state, keeping its id.
    pub fn reset(&self, ctx: &mut SessionContext) {
        ctx.reset(self.default_credential());
        tracing::info!(session_id = %ctx.id(), "session reset");
    }

    pub fn snapshot(&self, ctx: &SessionContext) -> SessionSnapshot {
        ctx.snapshot()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }
}
