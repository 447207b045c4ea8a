//! Execution records and results.
//!
//! An `ExecutionRecord` is the immutable audit fact written exactly once
//! per pipeline invocation (dry runs included) and never mutated. Serde
//! renames preserve the camelCase shape existing dashboards query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Closed taxonomy classifying why an invocation failed.
///
/// Serialized as the literal variant name (`"Timeout"`, `"BadRequest"`,
/// ...) to match what result consumers key on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Timeout,
    BadRequest,
    ServerError,
    NetworkError,
    ValidationError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "Timeout",
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::ServerError => "ServerError",
            ErrorKind::NetworkError => "NetworkError",
            ErrorKind::ValidationError => "ValidationError",
        }
    }
}

// ---------------------------------------------------------------------------
// Invocation request / result
// ---------------------------------------------------------------------------

/// A caller's request to execute a webhook, consumed from the upstream
/// auth/UI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub webhook_id: Uuid,
    /// Caller-supplied field values, keyed by the dotted field keys.
    #[serde(default)]
    pub payload: Value,
    pub conversation_id: String,
    pub message_id: String,
    #[serde(default)]
    pub dry_run: bool,
}

/// The structured outcome returned to the caller. Never a thrown fault:
/// external consumers render success and failure uniformly from this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// A successful outcome with the endpoint's status and response body.
    pub fn success(status: u16, data: Value, duration_ms: u64) -> Self {
        Self {
            success: true,
            status: Some(status),
            data: Some(data),
            error: None,
            error_kind: None,
            duration_ms,
        }
    }

    /// A failed outcome carrying the classified error.
    pub fn failure(
        status: Option<u16>,
        error: impl Into<String>,
        kind: ErrorKind,
        duration_ms: u64,
    ) -> Self {
        Self {
            success: false,
            status,
            data: None,
            error: Some(error.into()),
            error_kind: Some(kind),
            duration_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// ExecutionRecord
// ---------------------------------------------------------------------------

/// Immutable append-only audit fact describing one pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// UUIDv7 assigned when the record is built.
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    pub conversation_id: String,
    pub message_id: String,
    pub webhook_id: Uuid,
    pub webhook_name: String,
    /// The payload as sent (or as it would have been sent for dry runs
    /// and validation failures).
    pub request_payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(default)]
    pub dry_run: bool,
    pub duration_ms: u64,
    /// Always 0 in the current design -- reserved for a future retry
    /// driver outside this pipeline.
    pub retry_count: u32,
    pub executed_at: DateTime<Utc>,
}
