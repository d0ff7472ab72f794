//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use pitchbot_types::error::SessionError;
use pitchbot_types::speech::SpeechError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Flow errors raised by the chatbot service.
    Session(SessionError),
    /// Malformed request (bad id, unreadable body).
    Validation(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        let message = match self {
            AppError::Session(e) => e.to_string(),
            AppError::Validation(msg) => msg.clone(),
        };
        let (status, code) = match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Session(e) => match e {
                SessionError::NotFound => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
                SessionError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                SessionError::MissingCredential => (StatusCode::BAD_REQUEST, "MISSING_CREDENTIAL"),
                SessionError::NotConfigured => (StatusCode::CONFLICT, "NOT_CONFIGURED"),
                SessionError::AlreadyConfigured => (StatusCode::CONFLICT, "ALREADY_CONFIGURED"),
                SessionError::SoundDisabled => (StatusCode::CONFLICT, "SOUND_DISABLED"),
                SessionError::NothingToReplay => (StatusCode::CONFLICT, "NOTHING_TO_REPLAY"),
                SessionError::Speech(SpeechError::Timeout | SpeechError::Unintelligible) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "SPEECH_NOT_RECOGNIZED")
                }
                SessionError::Speech(_) => (StatusCode::BAD_GATEWAY, "SPEECH_SERVICE_ERROR"),
                SessionError::Provider(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
            },
        };
        (status, code, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::warn!(code, error = %message, "request failed");
        }
        (status, Json(ApiResponse::error(code, &message))).into_response()
    }
}
