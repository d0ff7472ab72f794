use thiserror::Error;

use crate::speech::SpeechError;

/// Errors from session flow operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,

    #[error("chatbot is not configured yet")]
    NotConfigured,

    #[error("chatbot is already configured; reset first")]
    AlreadyConfigured,

    #[error("Enter API key to continue")]
    MissingCredential,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Click 'Enable Sound' first!")]
    SoundDisabled,

    #[error("no assistant reply to replay")]
    NothingToReplay,

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error("could not reach the language model: {0}")]
    Provider(#[from] crate::llm::LlmError),
}

/// Errors while turning a model reply into a company profile.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("{0}")]
    Llm(#[from] crate::llm::LlmError),

    #[error("JSON not found")]
    JsonNotFound,

    #[error("invalid profile JSON: {0}")]
    InvalidJson(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_display() {
        let err = SessionError::InvalidInput("Fill both fields".to_string());
        assert_eq!(err.to_string(), "Fill both fields");
        assert_eq!(SessionError::SoundDisabled.to_string(), "Click 'Enable Sound' first!");
    }

    #[test]
    fn test_speech_error_is_transparent() {
        let err = SessionError::from(SpeechError::Timeout);
        assert_eq!(err.to_string(), "No speech detected");
    }

    #[test]
    fn test_extraction_error_display() {
        assert_eq!(ExtractionError::JsonNotFound.to_string(), "JSON not found");
        let err = ExtractionError::from(crate::llm::LlmError::AuthenticationFailed);
        assert_eq!(err.to_string(), "authentication failed");
    }
}
