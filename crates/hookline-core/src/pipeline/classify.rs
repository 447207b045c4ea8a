//! Failure classification into the closed [`ErrorKind`] taxonomy.
//!
//! Transport failures and non-2xx responses arrive here through
//! separate entry points because they are different facts: a transport
//! failure never produced a status, while a received response always
//! did. The taxonomy folds 401/403/404 into `ServerError` on purpose;
//! this layer only tells the caller whether resending a corrected
//! payload could help, and `BadRequest` is the only kind where it can.

use hookline_types::execution::ErrorKind;
use serde_json::Value;

/// How an outbound request failed before any HTTP status was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailureKind {
    Timeout,
    Connect,
    Other,
}

#[derive(Debug, Clone)]
pub struct TransportFailure {
    pub kind: TransportFailureKind,
    pub message: String,
}

/// A failure mapped into the taxonomy, with whatever the wire gave us.
#[derive(Debug, Clone)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub response_body: Option<Value>,
}

impl ClassifiedError {
    pub fn validation(errors: Vec<String>) -> Self {
        Self {
            kind: ErrorKind::ValidationError,
            message: errors.join("; "),
            status: None,
            response_body: None,
        }
    }
}

/// Classify a transport-level failure (no HTTP response received).
pub fn classify(failure: &TransportFailure) -> ClassifiedError {
    let timed_out = failure.kind == TransportFailureKind::Timeout
        || failure.message.to_lowercase().contains("timeout");
    let (kind, message) = if timed_out {
        (
            ErrorKind::Timeout,
            format!("request timed out: {}", failure.message),
        )
    } else if failure.kind == TransportFailureKind::Connect {
        (
            ErrorKind::NetworkError,
            format!("could not reach endpoint: {}", failure.message),
        )
    } else {
        (ErrorKind::NetworkError, failure.message.clone())
    };

    ClassifiedError {
        kind,
        message,
        status: None,
        response_body: None,
    }
}

/// Classify a received non-2xx HTTP response.
pub fn classify_status(status: u16, body: &Value) -> ClassifiedError {
    let body_text = match body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let (kind, message) = if status == 400 {
        (
            ErrorKind::BadRequest,
            format!("endpoint rejected the request: {body_text}"),
        )
    } else {
        (
            ErrorKind::ServerError,
            format!("endpoint returned status {status}"),
        )
    };

    ClassifiedError {
        kind,
        message,
        status: Some(status),
        response_body: Some(body.clone()),
    }
}

/// Whether the external caller should bother self-correcting and resending.
pub fn is_retryable(kind: ErrorKind) -> bool {
    kind == ErrorKind::BadRequest
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timeout_kind() {
        let c = classify(&TransportFailure {
            kind: TransportFailureKind::Timeout,
            message: "deadline elapsed".to_string(),
        });
        assert_eq!(c.kind, ErrorKind::Timeout);
        assert!(c.status.is_none());
    }

    #[test]
    fn test_timeout_detected_in_message() {
        let c = classify(&TransportFailure {
            kind: TransportFailureKind::Other,
            message: "operation Timeout while reading body".to_string(),
        });
        assert_eq!(c.kind, ErrorKind::Timeout);
    }

    #[test]
    fn test_connection_refused_is_network_error() {
        let c = classify(&TransportFailure {
            kind: TransportFailureKind::Connect,
            message: "connection refused".to_string(),
        });
        assert_eq!(c.kind, ErrorKind::NetworkError);
        assert!(c.message.contains("connection refused"));
    }

    #[test]
    fn test_unclassifiable_falls_back_to_network_error() {
        let c = classify(&TransportFailure {
            kind: TransportFailureKind::Other,
            message: "stream reset".to_string(),
        });
        assert_eq!(c.kind, ErrorKind::NetworkError);
        assert_eq!(c.message, "stream reset");
    }

    #[test]
    fn test_status_400_is_retryable_bad_request() {
        let c = classify_status(400, &json!({"msg": "bad"}));
        assert_eq!(c.kind, ErrorKind::BadRequest);
        assert_eq!(c.status, Some(400));
        assert!(c.message.contains(r#"{"msg":"bad"}"#));
        assert!(is_retryable(c.kind));
    }

    #[test]
    fn test_string_body_is_not_requoted() {
        let c = classify_status(400, &json!("plain reason"));
        assert!(c.message.contains("plain reason"));
        assert!(!c.message.contains('"'));
    }

    #[test]
    fn test_status_503_is_server_error_not_retryable() {
        let c = classify_status(503, &Value::Null);
        assert_eq!(c.kind, ErrorKind::ServerError);
        assert!(!is_retryable(c.kind));
    }

    #[test]
    fn test_auth_statuses_fold_into_server_error() {
        for status in [401, 403, 404, 418] {
            let c = classify_status(status, &Value::Null);
            assert_eq!(c.kind, ErrorKind::ServerError, "status {status}");
            assert_eq!(c.status, Some(status));
        }
    }

    #[test]
    fn test_validation_error_joins_messages() {
        let c = ClassifiedError::validation(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(c.kind, ErrorKind::ValidationError);
        assert_eq!(c.message, "a; b");
    }
}
