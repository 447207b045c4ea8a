//! SQLite execution record log.
//!
//! Append-only: records are inserted once and never updated or deleted.
//! Typed columns (status, error kind, timestamps) keep the dashboard
//! queries cheap; the request payload and response body are stored as
//! JSON text.

use chrono::{DateTime, Utc};
use hookline_types::error::RepositoryError;
use hookline_types::execution::{ErrorKind, ExecutionRecord};
use serde_json::Value;
use sqlx::Row;
use uuid::Uuid;

use hookline_core::repository::ExecutionLog;

use super::pool::DatabasePool;

/// SQLite-backed execution audit log.
#[derive(Clone)]
pub struct SqliteExecutionLog {
    pool: DatabasePool,
}

impl SqliteExecutionLog {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl ExecutionLog for SqliteExecutionLog {
    async fn append(&self, record: &ExecutionRecord) -> Result<(), RepositoryError> {
        let request_payload = serde_json::to_string(&record.request_payload)
            .map_err(|e| RepositoryError::Query(format!("unserializable payload: {e}")))?;
        let response_data = record
            .response_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("unserializable response: {e}")))?;

        sqlx::query(
            r#"INSERT INTO execution_records
               (id, workspace_id, user_id, conversation_id, message_id, webhook_id,
                webhook_name, request_payload, response_status, response_data,
                error, error_kind, dry_run, duration_ms, retry_count, executed_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(record.id.to_string())
        .bind(record.workspace_id.to_string())
        .bind(record.user_id.to_string())
        .bind(&record.conversation_id)
        .bind(&record.message_id)
        .bind(record.webhook_id.to_string())
        .bind(&record.webhook_name)
        .bind(request_payload)
        .bind(record.response_status.map(i64::from))
        .bind(response_data)
        .bind(&record.error)
        .bind(record.error_kind.map(|k| k.as_str()))
        .bind(record.dry_run as i64)
        .bind(record.duration_ms as i64)
        .bind(i64::from(record.retry_count))
        .bind(record.executed_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_for_webhook(
        &self,
        webhook_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<ExecutionRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM execution_records WHERE webhook_id = ? ORDER BY executed_at DESC LIMIT ?",
        )
        .bind(webhook_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_records(&rows)
    }

    async fn list_for_workspace(
        &self,
        workspace_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<ExecutionRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM execution_records WHERE workspace_id = ? ORDER BY executed_at DESC LIMIT ?",
        )
        .bind(workspace_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_records(&rows)
    }
}

// ---------------------------------------------------------------------------
// Private Row types
// ---------------------------------------------------------------------------

struct RecordRow {
    id: String,
    workspace_id: String,
    user_id: String,
    conversation_id: String,
    message_id: String,
    webhook_id: String,
    webhook_name: String,
    request_payload: String,
    response_status: Option<i64>,
    response_data: Option<String>,
    error: Option<String>,
    error_kind: Option<String>,
    dry_run: i64,
    duration_ms: i64,
    retry_count: i64,
    executed_at: String,
}

impl RecordRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            workspace_id: row.try_get("workspace_id")?,
            user_id: row.try_get("user_id")?,
            conversation_id: row.try_get("conversation_id")?,
            message_id: row.try_get("message_id")?,
            webhook_id: row.try_get("webhook_id")?,
            webhook_name: row.try_get("webhook_name")?,
            request_payload: row.try_get("request_payload")?,
            response_status: row.try_get("response_status")?,
            response_data: row.try_get("response_data")?,
            error: row.try_get("error")?,
            error_kind: row.try_get("error_kind")?,
            dry_run: row.try_get("dry_run")?,
            duration_ms: row.try_get("duration_ms")?,
            retry_count: row.try_get("retry_count")?,
            executed_at: row.try_get("executed_at")?,
        })
    }

    fn into_record(self) -> Result<ExecutionRecord, RepositoryError> {
        let request_payload: Value = serde_json::from_str(&self.request_payload)
            .map_err(|e| RepositoryError::Query(format!("corrupt request payload: {e}")))?;
        let response_data = self
            .response_data
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("corrupt response data: {e}")))?;
        let error_kind = self.error_kind.as_deref().map(parse_error_kind).transpose()?;

        Ok(ExecutionRecord {
            id: parse_uuid(&self.id, "id")?,
            workspace_id: parse_uuid(&self.workspace_id, "workspace_id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            conversation_id: self.conversation_id,
            message_id: self.message_id,
            webhook_id: parse_uuid(&self.webhook_id, "webhook_id")?,
            webhook_name: self.webhook_name,
            request_payload,
            response_status: self.response_status.map(|s| s as u16),
            response_data,
            error: self.error,
            error_kind,
            dry_run: self.dry_run != 0,
            duration_ms: self.duration_ms as u64,
            retry_count: self.retry_count as u32,
            executed_at: parse_datetime(&self.executed_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_uuid(s: &str, field: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid {field}: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn parse_error_kind(s: &str) -> Result<ErrorKind, RepositoryError> {
    match s {
        "Timeout" => Ok(ErrorKind::Timeout),
        "BadRequest" => Ok(ErrorKind::BadRequest),
        "ServerError" => Ok(ErrorKind::ServerError),
        "NetworkError" => Ok(ErrorKind::NetworkError),
        "ValidationError" => Ok(ErrorKind::ValidationError),
        other => Err(RepositoryError::Query(format!("invalid error kind: {other}"))),
    }
}

fn rows_to_records(
    rows: &[sqlx::sqlite::SqliteRow],
) -> Result<Vec<ExecutionRecord>, RepositoryError> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let record_row =
            RecordRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        records.push(record_row.into_record()?);
    }
    Ok(records)
}
