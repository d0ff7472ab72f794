//! Explicit per-session state.
//!
//! A `SessionContext` is owned by whoever drives the session (the terminal
//! client, or the `SessionStore` behind the REST API) and is passed by
//! `&mut` to every `ChatbotService` operation.

use secrecy::SecretString;
use uuid::Uuid;

use pitchbot_types::chat::ConversationTurn;
use pitchbot_types::profile::CompanyProfile;
use pitchbot_types::session::{SessionPhase, SessionSnapshot};

use crate::chat::conversation::Conversation;
use crate::llm::box_provider::BoxLlmProvider;

/// Everything that exists only once the chatbot is configured.
#[derive(Debug)]
pub struct ActiveChat {
    pub profile: CompanyProfile,
    pub(crate) transcript: Vec<ConversationTurn>,
    pub(crate) conversation: Conversation,
    pub(crate) provider: BoxLlmProvider,
}

impl ActiveChat {
    pub(crate) fn new(
        profile: CompanyProfile,
        conversation: Conversation,
        provider: BoxLlmProvider,
    ) -> Self {
        let transcript = vec![ConversationTurn::assistant(profile.welcome_message.clone())];
        Self {
            profile,
            transcript,
            conversation,
            provider,
        }
    }

    /// Append-only view of the transcript.
    pub fn transcript(&self) -> &[ConversationTurn] {
        &self.transcript
    }

    pub(crate) fn push(&mut self, turn: ConversationTurn) {
        self.transcript.push(turn);
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Text of the last turn, if it came from the assistant.
    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.transcript
            .last()
            .filter(|turn| turn.is_assistant())
            .map(|turn| turn.content.as_str())
    }
}

/// Setup screen or active chat. The profile only exists in `Active`.
#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Setup,
    Active(Box<ActiveChat>),
}

/// One user's session.
#[derive(Debug)]
pub struct SessionContext {
    id: Uuid,
    credential: Option<SecretString>,
    audio_allowed: bool,
    state: SessionState,
}

impl SessionContext {
    /// Fresh Setup session seeded with the process default credential.
    pub fn new(credential: Option<SecretString>) -> Self {
        Self::with_id(Uuid::now_v7(), credential)
    }

    pub fn with_id(id: Uuid, credential: Option<SecretString>) -> Self {
        Self {
            id,
            credential,
            audio_allowed: false,
            state: SessionState::Setup,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn credential(&self) -> Option<&SecretString> {
        self.credential.as_ref()
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub(crate) fn set_credential(&mut self, credential: SecretString) {
        self.credential = Some(credential);
    }

    pub fn audio_allowed(&self) -> bool {
        self.audio_allowed
    }

    pub(crate) fn allow_audio(&mut self) {
        self.audio_allowed = true;
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            SessionState::Setup => SessionPhase::Setup,
            SessionState::Active(_) => SessionPhase::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    pub fn active(&self) -> Option<&ActiveChat> {
        match &self.state {
            SessionState::Active(chat) => Some(&**chat),
            SessionState::Setup => None,
        }
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut ActiveChat> {
        match &mut self.state {
            SessionState::Active(chat) => Some(&mut **chat),
            SessionState::Setup => None,
        }
    }

    pub fn profile(&self) -> Option<&CompanyProfile> {
        self.active().map(|chat| &chat.profile)
    }

    pub fn transcript(&self) -> &[ConversationTurn] {
        self.active().map(ActiveChat::transcript).unwrap_or_default()
    }

    /// Replay is offered only when the last transcript entry is the assistant's.
    pub fn can_replay(&self) -> bool {
        self.active()
            .and_then(ActiveChat::last_assistant_reply)
            .is_some()
    }

    pub(crate) fn activate(&mut self, chat: ActiveChat) {
        self.state = SessionState::Active(Box::new(chat));
    }

    /// Discard everything except the id.
    pub(crate) fn reset(&mut self, credential: Option<SecretString>) {
        *self = Self::with_id(self.id, credential);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            phase: self.phase(),
            profile: self.profile().cloned(),
            transcript: self.transcript().to_vec(),
            audio_allowed: self.audio_allowed,
            has_credential: self.has_credential(),
            can_replay: self.can_replay(),
        }
    }
}
