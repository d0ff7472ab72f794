//! Per-session state and the flow controller that drives it.

pub mod context;
pub mod service;
pub mod store;
