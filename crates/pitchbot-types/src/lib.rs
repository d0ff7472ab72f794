//! Shared domain types for Pitchbot.
//!
//! This crate contains the core domain types used across the Pitchbot
//! workspace: the company profile, conversation turns, LLM request shapes,
//! speech payloads, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod profile;
pub mod session;
pub mod speech;
