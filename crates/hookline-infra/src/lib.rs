//! Infrastructure layer for Hookline.
//!
//! Contains implementations of the traits defined in `hookline-core`:
//! SQLite repositories, the reqwest-backed HTTP transport, and the
//! AES-256-GCM vault used to keep secure header values encrypted at
//! rest, plus the `config.toml` loader.

pub mod config;
pub mod crypto;
pub mod http;
pub mod sqlite;
