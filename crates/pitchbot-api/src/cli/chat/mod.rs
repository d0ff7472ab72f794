//! Interactive terminal chat for Pitchbot.
//!
//! Setup prompts, the company banner, text and voice turns, and slash
//! commands. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
