//! Conversation handle and the turn responder.
//!
//! `Conversation` owns the model-side history of one session;
//! `responder` builds the per-turn prompt and turns provider failures into
//! a tagged `ChatReply`.

pub mod conversation;
pub mod responder;
