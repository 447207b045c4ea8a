//! Shared domain types for Hookline.
//!
//! This crate contains the core domain types used across the Hookline
//! webhook execution pipeline: WebhookDefinition, ExecutionRecord, tier
//! tables, workspace membership, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod error;
pub mod execution;
pub mod tier;
pub mod webhook;
pub mod workspace;
