//! Business logic and port definitions for Pitchbot.
//!
//! This crate defines the traits (LLM provider, speech adapters) that the
//! infrastructure layer implements, plus the profile extractor, the chat
//! responder and the session flow controller. It depends only on
//! `pitchbot-types` -- never on `pitchbot-infra` or any network crate.

pub mod chat;
pub mod llm;
pub mod profile;
pub mod session;
pub mod speech;
