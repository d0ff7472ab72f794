//! Session lifecycle types for Pitchbot.
//!
//! A session is either in `Setup` (no profile yet) or `Active` (profile
//! extracted, transcript seeded with the welcome message).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

use crate::chat::ConversationTurn;
use crate::profile::CompanyProfile;

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Setup,
    Active,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Setup => write!(f, "setup"),
            SessionPhase::Active => write!(f, "active"),
        }
    }
}

/// Read-only view of a session, safe to serialize (never carries the credential).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub phase: SessionPhase,
    pub profile: Option<CompanyProfile>,
    pub transcript: Vec<ConversationTurn>,
    pub audio_allowed: bool,
    pub has_credential: bool,
    /// Replay is only offered when the last turn is from the assistant.
    pub can_replay: bool,
}

/// Result of moving a session from Setup to Active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchOutcome {
    pub profile: CompanyProfile,
    /// Non-fatal notice, set when the placeholder profile was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl LaunchOutcome {
    pub fn used_fallback(&self) -> bool {
        self.notice.is_some()
    }
}
