//! Conversation transcript types for Pitchbot.
//!
//! The transcript is the ordered, append-only list of turns shown to the user.
//! Turns are either from the user or from the assistant; a failed model call
//! still produces an assistant turn, flagged with `failed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Prefix shown in place of a reply when the model call failed.
pub const ERROR_MARKER: &str = "Error: ";

/// A single entry in the session transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// True for assistant turns that carry an error instead of a model reply.
    #[serde(default)]
    pub failed: bool,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            created_at: Utc::now(),
            failed: false,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            created_at: Utc::now(),
            failed: false,
        }
    }

    /// Assistant turn recording a reply (or a failure) from the responder.
    pub fn from_reply(reply: &ChatReply) -> Self {
        Self {
            failed: reply.is_failed(),
            ..Self::assistant(reply.transcript_text())
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}

/// Outcome of one chat turn against the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChatReply {
    /// The model answered.
    Answer { text: String },
    /// The model call failed; `message` describes why.
    Failed { message: String },
}

impl ChatReply {
    pub fn answer(text: impl Into<String>) -> Self {
        ChatReply::Answer { text: text.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ChatReply::Failed {
            message: message.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ChatReply::Failed { .. })
    }

    /// Text placed in the transcript for this reply.
    ///
    /// Failures render as `Error: {message}` so they read as bot text.
    pub fn transcript_text(&self) -> String {
        match self {
            ChatReply::Answer { text } => text.clone(),
            ChatReply::Failed { message } => format!("{ERROR_MARKER}{message}"),
        }
    }
}

/// The pair of turns appended by one user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub user: ConversationTurn,
    pub assistant: ConversationTurn,
    pub reply: ChatReply,
}
