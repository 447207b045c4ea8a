use thiserror::Error;

/// Access-control failures raised before a webhook + workspace context
/// exists. These surface directly to the caller and never produce an
/// execution record.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("webhook not found")]
    NotFound,

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors from repository operations (used by trait definitions in hookline-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
