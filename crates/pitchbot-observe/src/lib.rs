//! Observability setup for Pitchbot: tracing subscriber and optional
//! OpenTelemetry export.

pub mod tracing_setup;
