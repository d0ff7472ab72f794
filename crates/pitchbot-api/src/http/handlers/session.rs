//! Session lifecycle HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions                 - Create a session (Setup)
//! - GET    /api/v1/sessions/{id}            - Session snapshot
//! - DELETE /api/v1/sessions/{id}            - Discard a session
//! - PUT    /api/v1/sessions/{id}/credential - Override the API key
//! - POST   /api/v1/sessions/{id}/sound      - Allow audio output and voice input
//! - POST   /api/v1/sessions/{id}/launch     - Extract the profile and go Active
//! - POST   /api/v1/sessions/{id}/reset      - Back to a fresh Setup state

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use pitchbot_types::profile::CompanyRequest;
use pitchbot_types::session::{LaunchOutcome, SessionSnapshot};

use super::{lookup, session_href};
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// Request body for overriding a session's API key.
///
/// Not `Debug`: it carries a raw key.
#[derive(Deserialize)]
pub struct CredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

fn snapshot_response(
    clock: RequestClock,
    snapshot: SessionSnapshot,
) -> Json<ApiResponse<SessionSnapshot>> {
    let href = session_href(&snapshot.id);
    let resp = clock
        .respond(snapshot)
        .with_link("self", &href)
        .with_link("messages", &format!("{href}/messages"));
    Json(resp)
}

/// POST /api/v1/sessions - Create a session in the Setup phase.
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<SessionSnapshot>>) {
    let clock = RequestClock::start();
    let ctx = state.chatbot.new_session();
    let snapshot = state.chatbot.snapshot(&ctx);
    state.sessions.insert(ctx);
    (StatusCode::CREATED, snapshot_response(clock, snapshot))
}

/// GET /api/v1/sessions/{id} - Snapshot of a session.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SessionSnapshot>>, AppError> {
    let clock = RequestClock::start();
    let (_, session) = lookup(&state, &id)?;
    let snapshot = state.chatbot.snapshot(&*session.lock().await);
    Ok(snapshot_response(clock, snapshot))
}

/// DELETE /api/v1/sessions/{id} - Discard a session.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Deleted>>, AppError> {
    let clock = RequestClock::start();
    let (id, _) = lookup(&state, &id)?;
    let deleted = state.sessions.remove(&id);
    Ok(Json(clock.respond(Deleted { deleted })))
}

/// PUT /api/v1/sessions/{id}/credential - Override the session's API key.
pub async fn set_credential(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CredentialRequest>,
) -> Result<Json<ApiResponse<SessionSnapshot>>, AppError> {
    let clock = RequestClock::start();
    let (_, session) = lookup(&state, &id)?;
    let mut ctx = session.lock().await;
    state.chatbot.set_credential(&mut ctx, &body.api_key)?;
    Ok(snapshot_response(clock, state.chatbot.snapshot(&ctx)))
}

/// POST /api/v1/sessions/{id}/sound - Enable audio for the session.
pub async fn enable_sound(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SessionSnapshot>>, AppError> {
    let clock = RequestClock::start();
    let (_, session) = lookup(&state, &id)?;
    let mut ctx = session.lock().await;
    state.chatbot.enable_sound(&mut ctx);
    Ok(snapshot_response(clock, state.chatbot.snapshot(&ctx)))
}

/// POST /api/v1/sessions/{id}/launch - Build the profile and start chatting.
///
/// A failed extraction still launches with the placeholder profile; the
/// envelope's `data.notice` carries the reason.
pub async fn launch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CompanyRequest>,
) -> Result<Json<ApiResponse<LaunchOutcome>>, AppError> {
    let clock = RequestClock::start();
    let (id, session) = lookup(&state, &id)?;
    let mut ctx = session.lock().await;
    let outcome = state.chatbot.launch(&mut ctx, &request).await?;

    let href = session_href(&id);
    let resp = clock
        .respond(outcome)
        .with_link("session", &href)
        .with_link("messages", &format!("{href}/messages"));
    Ok(Json(resp))
}

/// POST /api/v1/sessions/{id}/reset - Return the session to Setup.
pub async fn reset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SessionSnapshot>>, AppError> {
    let clock = RequestClock::start();
    let (_, session) = lookup(&state, &id)?;
    let mut ctx = session.lock().await;
    state.chatbot.reset(&mut ctx);
    Ok(snapshot_response(clock, state.chatbot.snapshot(&ctx)))
}
