//! HTTP request handlers for the REST API.

pub mod chat;
pub mod session;

use uuid::Uuid;

use pitchbot_core::session::store::SharedSession;
use pitchbot_types::error::SessionError;

use crate::http::error::AppError;
use crate::state::AppState;

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// Resolve the session named by a path parameter.
fn lookup(state: &AppState, id: &str) -> Result<(Uuid, SharedSession), AppError> {
    let id = parse_uuid(id)?;
    let session = state.sessions.get(&id).ok_or(SessionError::NotFound)?;
    Ok((id, session))
}

fn session_href(id: &Uuid) -> String {
    format!("/api/v1/sessions/{id}")
}
