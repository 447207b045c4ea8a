//! The top-level pipeline orchestrator.
//!
//! `Dispatcher::execute` runs one invocation end to end: authorize,
//! resolve the timeout from the workspace owner's tier, transform and
//! validate the payload, resolve headers, issue the bounded outbound
//! call, classify any failure and append the audit record. Pure
//! access-control failures before a context exists return `Err` and
//! write nothing; once the definition and workspace are resolved every
//! outcome, dry runs included, produces exactly one record. Everything
//! after authorization runs under a panic boundary so no fault ever
//! escapes to the caller.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::FutureExt;
use hookline_types::error::AccessError;
use hookline_types::execution::{ErrorKind, ExecuteRequest, ExecutionRecord, ExecutionResult};
use hookline_types::webhook::HttpMethod;
use hookline_types::workspace::Caller;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::repository::{ExecutionLog, WebhookRepository, WorkspaceRepository};

use super::access::{AccessContext, AccessGate};
use super::classify::{self, ClassifiedError, TransportFailure};
use super::headers::{HeaderCipher, HeaderResolver};
use super::tier::TierPolicy;
use super::{transform, validate};

// ---------------------------------------------------------------------------
// Transport trait
// ---------------------------------------------------------------------------

/// One assembled outbound HTTP call.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    /// Query parameters; used for GET payloads.
    pub query: Vec<(String, String)>,
    /// JSON body for methods that carry one.
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// A received HTTP response. Non-2xx statuses are data, not failures.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

/// Issues the outbound call; only genuine transport faults are errors.
pub trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl std::future::Future<Output = Result<TransportResponse, TransportFailure>> + Send;
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct Dispatcher<W, S, L, C, T> {
    gate: AccessGate<W, S>,
    policy: TierPolicy,
    headers: HeaderResolver<C>,
    transport: T,
    log: L,
}

impl<W, S, L, C, T> Dispatcher<W, S, L, C, T>
where
    W: WebhookRepository,
    S: WorkspaceRepository,
    L: ExecutionLog,
    C: HeaderCipher,
    T: HttpTransport,
{
    pub fn new(
        gate: AccessGate<W, S>,
        policy: TierPolicy,
        headers: HeaderResolver<C>,
        transport: T,
        log: L,
    ) -> Self {
        Self {
            gate,
            policy,
            headers,
            transport,
            log,
        }
    }

    /// Execute one webhook invocation for `caller`.
    ///
    /// `Err` carries only access-control failures; every pipeline
    /// failure after authorization comes back as a structured
    /// [`ExecutionResult`].
    pub async fn execute(
        &self,
        caller: &Caller,
        request: ExecuteRequest,
    ) -> Result<ExecutionResult, AccessError> {
        let ctx = self.gate.authorize(caller, &request.webhook_id).await?;
        let started = Instant::now();

        match AssertUnwindSafe(self.run(caller, &request, &ctx, started))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!(
                    webhook_id = %request.webhook_id,
                    "pipeline panicked, returning generic failure"
                );
                Ok(ExecutionResult::failure(
                    None,
                    "webhook execution failed unexpectedly",
                    ErrorKind::NetworkError,
                    elapsed_ms(started),
                ))
            }
        }
    }

    async fn run(
        &self,
        caller: &Caller,
        request: &ExecuteRequest,
        ctx: &AccessContext,
        started: Instant,
    ) -> Result<ExecutionResult, AccessError> {
        let definition = &ctx.definition;

        let tier = self.gate.owner_tier(&ctx.workspace_id).await;
        let timeout_secs = self
            .policy
            .resolve_timeout(tier, definition.timeout_seconds);

        let transformed = match transform::render(
            definition.body_template.as_deref(),
            &definition.fields,
            &request.payload,
        ) {
            Ok(payload) => payload,
            Err(err) => {
                let classified = ClassifiedError::validation(vec![err.to_string()]);
                return Ok(self
                    .fail(caller, request, ctx, request.payload.clone(), classified, started)
                    .await);
            }
        };

        let results = validate::validate(&transformed, &definition.fields);
        if !validate::is_valid(&results) {
            let classified = ClassifiedError::validation(validate::collect_errors(&results));
            return Ok(self
                .fail(caller, request, ctx, transformed, classified, started)
                .await);
        }

        if request.dry_run {
            let data = json!({
                "dryRun": true,
                "transformedPayload": transformed,
            });
            let duration_ms = elapsed_ms(started);
            self.append_record(ExecutionRecord {
                id: Uuid::now_v7(),
                workspace_id: ctx.workspace_id,
                user_id: caller.id,
                conversation_id: request.conversation_id.clone(),
                message_id: request.message_id.clone(),
                webhook_id: definition.id,
                webhook_name: definition.name.clone(),
                request_payload: transformed,
                response_status: Some(200),
                response_data: Some(data.clone()),
                error: None,
                error_kind: None,
                dry_run: true,
                duration_ms,
                retry_count: 0,
                executed_at: Utc::now(),
            })
            .await;
            return Ok(ExecutionResult::success(200, data, duration_ms));
        }

        let headers = self
            .headers
            .resolve(&definition.headers, &definition.secure_headers)?;

        let query = if definition.http_method == HttpMethod::Get {
            query_params(&transformed)
        } else {
            Vec::new()
        };
        let body = definition
            .http_method
            .has_body()
            .then(|| transformed.clone());

        let outbound = TransportRequest {
            method: definition.http_method,
            url: definition.endpoint_url.clone(),
            headers,
            query,
            body,
            timeout: Duration::from_secs(u64::from(timeout_secs)),
        };

        tracing::debug!(
            webhook_id = %definition.id,
            method = definition.http_method.as_str(),
            timeout_secs,
            tier = tier.as_str(),
            "dispatching webhook call"
        );

        match self.transport.send(outbound).await {
            Err(failure) => {
                let classified = classify::classify(&failure);
                Ok(self
                    .fail(caller, request, ctx, transformed, classified, started)
                    .await)
            }
            Ok(response) if (200..300).contains(&response.status) => {
                let duration_ms = elapsed_ms(started);
                self.append_record(ExecutionRecord {
                    id: Uuid::now_v7(),
                    workspace_id: ctx.workspace_id,
                    user_id: caller.id,
                    conversation_id: request.conversation_id.clone(),
                    message_id: request.message_id.clone(),
                    webhook_id: definition.id,
                    webhook_name: definition.name.clone(),
                    request_payload: transformed,
                    response_status: Some(response.status),
                    response_data: Some(response.body.clone()),
                    error: None,
                    error_kind: None,
                    dry_run: false,
                    duration_ms,
                    retry_count: 0,
                    executed_at: Utc::now(),
                })
                .await;
                Ok(ExecutionResult::success(
                    response.status,
                    response.body,
                    duration_ms,
                ))
            }
            Ok(response) => {
                let classified = classify::classify_status(response.status, &response.body);
                Ok(self
                    .fail(caller, request, ctx, transformed, classified, started)
                    .await)
            }
        }
    }

    /// Append the failure record and build the caller-visible result.
    async fn fail(
        &self,
        caller: &Caller,
        request: &ExecuteRequest,
        ctx: &AccessContext,
        payload: Value,
        classified: ClassifiedError,
        started: Instant,
    ) -> ExecutionResult {
        let duration_ms = elapsed_ms(started);
        self.append_record(ExecutionRecord {
            id: Uuid::now_v7(),
            workspace_id: ctx.workspace_id,
            user_id: caller.id,
            conversation_id: request.conversation_id.clone(),
            message_id: request.message_id.clone(),
            webhook_id: ctx.definition.id,
            webhook_name: ctx.definition.name.clone(),
            request_payload: payload,
            response_status: classified.status,
            response_data: classified.response_body.clone(),
            error: Some(classified.message.clone()),
            error_kind: Some(classified.kind),
            dry_run: false,
            duration_ms,
            retry_count: 0,
            executed_at: Utc::now(),
        })
        .await;

        ExecutionResult::failure(classified.status, classified.message, classified.kind, duration_ms)
    }

    /// Best-effort audit write: awaited, but a failure only warns.
    async fn append_record(&self, record: ExecutionRecord) {
        if let Err(err) = self.log.append(&record).await {
            tracing::warn!(
                webhook_id = %record.webhook_id,
                error = %err,
                "failed to append execution record"
            );
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// Flatten a payload into GET query parameters. Scalar leaves become
/// plain strings; nested values are carried as compact JSON.
fn query_params(payload: &Value) -> Vec<(String, String)> {
    let Some(map) = payload.as_object() else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                scalar @ (Value::Bool(_) | Value::Number(_)) => scalar.to_string(),
                nested => nested.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
