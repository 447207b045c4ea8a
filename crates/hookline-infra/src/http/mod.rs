//! Outbound HTTP plumbing.

pub mod transport;
