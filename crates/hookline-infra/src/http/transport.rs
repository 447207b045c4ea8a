//! reqwest-backed implementation of the pipeline's `HttpTransport`.
//!
//! Non-2xx statuses come back as ordinary responses; only genuine
//! transport faults (timeout, DNS, connection refused) surface as
//! `TransportFailure`. The per-request timeout enforces the
//! tier-resolved deadline.

use hookline_core::pipeline::classify::{TransportFailure, TransportFailureKind};
use hookline_core::pipeline::dispatch::{HttpTransport, TransportRequest, TransportResponse};
use hookline_types::webhook::HttpMethod;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

/// Shared `reqwest::Client` issuing webhook calls.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFailure> {
        let mut builder = self
            .client
            .request(method_of(request.method), &request.url)
            .headers(header_map(&request.headers)?)
            .timeout(request.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(failure_of)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(failure_of)?;

        Ok(TransportResponse {
            status,
            body: parse_body(&text),
        })
    }
}

fn method_of(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn header_map(
    headers: &std::collections::HashMap<String, String>,
) -> Result<HeaderMap, TransportFailure> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| TransportFailure {
            kind: TransportFailureKind::Other,
            message: format!("invalid header name '{key}': {e}"),
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| TransportFailure {
            kind: TransportFailureKind::Other,
            message: format!("invalid value for header '{key}': {e}"),
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

fn failure_of(err: reqwest::Error) -> TransportFailure {
    let kind = if err.is_timeout() {
        TransportFailureKind::Timeout
    } else if err.is_connect() {
        TransportFailureKind::Connect
    } else {
        TransportFailureKind::Other
    };
    TransportFailure {
        kind,
        message: err.to_string(),
    }
}

/// Interpret a response body: empty bodies become null, JSON parses as
/// JSON, anything else is carried as a raw string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookline_core::pipeline::classify;
    use hookline_types::execution::ErrorKind;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("   "), Value::Null);
        assert_eq!(parse_body(r#"{"ok":true}"#), json!({"ok": true}));
        assert_eq!(parse_body("plain text"), json!("plain text"));
    }

    #[test]
    fn test_header_map_rejects_invalid_names() {
        let mut headers = HashMap::new();
        headers.insert("bad header\n".to_string(), "v".to_string());
        let err = header_map(&headers).unwrap_err();
        assert_eq!(err.kind, TransportFailureKind::Other);
    }

    #[tokio::test]
    async fn test_connection_refused_classifies_as_network_error() {
        let transport = ReqwestTransport::new();
        // Port 9 (discard) is not listening locally.
        let failure = transport
            .send(TransportRequest {
                method: HttpMethod::Get,
                url: "http://127.0.0.1:9/hook".to_string(),
                headers: HashMap::new(),
                query: Vec::new(),
                body: None,
                timeout: Duration::from_secs(2),
            })
            .await
            .unwrap_err();

        let classified = classify::classify(&failure);
        assert!(matches!(
            classified.kind,
            ErrorKind::NetworkError | ErrorKind::Timeout
        ));
    }
}
