//! Observability for Hookline: tracing subscriber setup.

pub mod tracing_setup;
