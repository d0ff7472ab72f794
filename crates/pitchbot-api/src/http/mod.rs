//! HTTP/REST API layer for Pitchbot.
//!
//! Axum-based REST API at `/api/v1/` with an envelope response format and
//! CORS support. Each session is addressed by its UUID.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
