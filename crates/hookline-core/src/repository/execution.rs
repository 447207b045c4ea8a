//! Execution record sink trait.
//!
//! Records are append-only: the pipeline writes exactly one per
//! invocation once a webhook + workspace context exists and never
//! mutates or deletes them. The list queries back the (external)
//! dashboard.

use hookline_types::error::RepositoryError;
use hookline_types::execution::ExecutionRecord;
use uuid::Uuid;

/// Append-only sink and history reader for execution records.
pub trait ExecutionLog: Send + Sync {
    /// Append one execution record.
    fn append(
        &self,
        record: &ExecutionRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Recent executions of one webhook, newest first.
    fn list_for_webhook(
        &self,
        webhook_id: &Uuid,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ExecutionRecord>, RepositoryError>> + Send;

    /// Recent executions across a workspace, newest first.
    fn list_for_workspace(
        &self,
        workspace_id: &Uuid,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ExecutionRecord>, RepositoryError>> + Send;
}
