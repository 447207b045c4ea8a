//! The webhook execution pipeline.
//!
//! Control flow: access gate → tier timeout resolution → payload
//! transform → field validation → header resolution → bounded outbound
//! call → error classification → execution record write. The dispatcher
//! in [`dispatch`] orchestrates the leaves.

pub mod access;
pub mod classify;
pub mod dispatch;
pub mod headers;
pub mod path;
pub mod tier;
pub mod transform;
pub mod validate;
