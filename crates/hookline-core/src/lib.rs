//! Webhook execution pipeline and repository trait definitions for Hookline.
//!
//! This crate defines the "ports" (repository and transport traits) that
//! the infrastructure layer implements, plus the pipeline itself:
//! access gate, tier policy, payload transformer, field validator, error
//! classifier, header resolver, and the dispatcher that orchestrates them.
//! It depends only on `hookline-types` -- never on `hookline-infra` or any
//! database/IO crate.

pub mod pipeline;
pub mod repository;
