//! Workspace membership repository trait.

use hookline_types::error::RepositoryError;
use hookline_types::workspace::WorkspaceMember;
use uuid::Uuid;

/// Read-only storage interface for workspace membership and billing
/// resolution.
pub trait WorkspaceRepository: Send + Sync {
    /// Resolve the membership record for `(workspace_id, user_id)`.
    fn get_membership(
        &self,
        workspace_id: &Uuid,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<WorkspaceMember>, RepositoryError>> + Send;

    /// Follow workspace → owner → subscription and return the owner's
    /// plan id. `None` at any missing link (no workspace, no owner
    /// subscription) -- the caller defaults the tier to free.
    fn get_owner_plan(
        &self,
        workspace_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send;
}
