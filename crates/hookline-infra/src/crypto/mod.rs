//! Cryptographic operations.

pub mod vault;
