//! Chat turn HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/sessions/{id}/messages - Send a text message
//! - GET  /api/v1/sessions/{id}/messages - Full transcript
//! - POST /api/v1/sessions/{id}/voice    - Send a spoken message (WAV body)
//! - GET  /api/v1/sessions/{id}/replay   - Last reply as MP3

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use pitchbot_infra::audio::decode_wav;
use pitchbot_types::chat::{ConversationTurn, Exchange};

use super::{lookup, session_href};
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// Request body for a text message.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// Outcome of a voice turn. The synthesized reply is fetched from `replay`.
#[derive(Debug, Serialize)]
pub struct VoiceReply {
    /// What the recognizer heard.
    pub heard: String,
    pub exchange: Exchange,
    /// Whether the reply was synthesized.
    pub spoken: bool,
}

/// POST /api/v1/sessions/{id}/messages - Append a user message and the reply.
///
/// A failed model call is not an HTTP error: the assistant turn carries
/// `failed: true` and the reply is tagged `failed`.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<Exchange>>, AppError> {
    let clock = RequestClock::start();
    let (id, session) = lookup(&state, &id)?;
    let mut ctx = session.lock().await;
    let exchange = state.chatbot.send_text(&mut ctx, &body.text).await?;

    let href = session_href(&id);
    let resp = clock
        .respond(exchange)
        .with_link("messages", &format!("{href}/messages"))
        .with_link("replay", &format!("{href}/replay"));
    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id}/messages - The session transcript.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ConversationTurn>>>, AppError> {
    let clock = RequestClock::start();
    let (id, session) = lookup(&state, &id)?;
    let transcript = session.lock().await.transcript().to_vec();

    let resp = clock
        .respond(transcript)
        .with_link("self", &format!("{}/messages", session_href(&id)));
    Ok(Json(resp))
}

/// POST /api/v1/sessions/{id}/voice - Recognize a WAV upload and answer it.
pub async fn send_voice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ApiResponse<VoiceReply>>, AppError> {
    let clock = RequestClock::start();
    let (id, session) = lookup(&state, &id)?;
    let mut ctx = session.lock().await;

    state.chatbot.ensure_voice_ready(&ctx)?;
    let audio = decode_wav(&body).map_err(|e| AppError::Validation(e.to_string()))?;
    let voice = state.chatbot.send_voice(&mut ctx, &audio).await?;

    let reply = VoiceReply {
        heard: voice.heard,
        exchange: voice.exchange,
        spoken: voice.audio.is_some(),
    };
    let resp = clock
        .respond(reply)
        .with_link("replay", &format!("{}/replay", session_href(&id)));
    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id}/replay - Speak the last assistant reply.
///
/// Returns `audio/mpeg`, or 204 when synthesis failed.
pub async fn replay(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (_, session) = lookup(&state, &id)?;
    let clip = state.chatbot.replay(&*session.lock().await).await?;

    Ok(match clip {
        Some(clip) => ([(header::CONTENT_TYPE, clip.mime)], clip.bytes).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
