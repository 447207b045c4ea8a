//! SQLite workspace membership repository.
//!
//! Backs authorization (membership lookup) and billing-tier resolution
//! (workspace owner → subscription plan). The write methods exist for
//! the (external) management surface and the tests; the pipeline only
//! reads.

use hookline_types::error::RepositoryError;
use hookline_types::workspace::{MemberRole, MemberStatus, Workspace, WorkspaceMember};
use sqlx::Row;
use uuid::Uuid;

use hookline_core::repository::WorkspaceRepository;

use super::pool::DatabasePool;

/// SQLite-backed workspace store.
#[derive(Clone)]
pub struct SqliteWorkspaceRepository {
    pool: DatabasePool,
}

impl SqliteWorkspaceRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn save_workspace(&self, workspace: &Workspace) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT OR REPLACE INTO workspaces (id, owner_id, name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(workspace.id.to_string())
        .bind(workspace.owner_id.to_string())
        .bind(&workspace.name)
        .bind(workspace.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    pub async fn save_member(&self, member: &WorkspaceMember) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT OR REPLACE INTO workspace_members (workspace_id, user_id, email, role, status)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(member.workspace_id.to_string())
        .bind(member.user_id.to_string())
        .bind(&member.email)
        .bind(role_str(member.role))
        .bind(status_str(member.status))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    /// Record a user's subscription plan.
    pub async fn set_subscription(
        &self,
        user_id: &Uuid,
        plan_id: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT OR REPLACE INTO user_subscriptions (user_id, plan_id) VALUES (?, ?)")
            .bind(user_id.to_string())
            .bind(plan_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }
}

impl WorkspaceRepository for SqliteWorkspaceRepository {
    async fn get_membership(
        &self,
        workspace_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<WorkspaceMember>, RepositoryError> {
        let row = sqlx::query(
            "SELECT workspace_id, user_id, email, role, status FROM workspace_members WHERE workspace_id = ? AND user_id = ?",
        )
        .bind(workspace_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| MemberRow::from_row(&row)?.into_member())
            .transpose()
    }

    async fn get_owner_plan(&self, workspace_id: &Uuid) -> Result<Option<String>, RepositoryError> {
        // LEFT JOIN: a workspace whose owner has no subscription row
        // yields NULL, which the policy layer defaults to free.
        let row = sqlx::query(
            r#"SELECT s.plan_id AS plan_id
               FROM workspaces w
               LEFT JOIN user_subscriptions s ON s.user_id = w.owner_id
               WHERE w.id = ?"#,
        )
        .bind(workspace_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let plan: Option<String> = row
            .try_get("plan_id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(plan)
    }
}

// ---------------------------------------------------------------------------
// Private Row types
// ---------------------------------------------------------------------------

struct MemberRow {
    workspace_id: String,
    user_id: String,
    email: Option<String>,
    role: String,
    status: String,
}

impl MemberRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, RepositoryError> {
        let get = |e: sqlx::Error| RepositoryError::Query(e.to_string());
        Ok(Self {
            workspace_id: row.try_get("workspace_id").map_err(get)?,
            user_id: row.try_get("user_id").map_err(get)?,
            email: row.try_get("email").map_err(get)?,
            role: row.try_get("role").map_err(get)?,
            status: row.try_get("status").map_err(get)?,
        })
    }

    fn into_member(self) -> Result<WorkspaceMember, RepositoryError> {
        Ok(WorkspaceMember {
            workspace_id: parse_uuid(&self.workspace_id, "workspace_id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            email: self.email,
            role: parse_role(&self.role)?,
            status: parse_status(&self.status)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_uuid(s: &str, field: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid {field}: {e}")))
}

fn role_str(role: MemberRole) -> &'static str {
    match role {
        MemberRole::Owner => "owner",
        MemberRole::Admin => "admin",
        MemberRole::Member => "member",
    }
}

fn parse_role(s: &str) -> Result<MemberRole, RepositoryError> {
    match s {
        "owner" => Ok(MemberRole::Owner),
        "admin" => Ok(MemberRole::Admin),
        "member" => Ok(MemberRole::Member),
        other => Err(RepositoryError::Query(format!("invalid role: {other}"))),
    }
}

fn status_str(status: MemberStatus) -> &'static str {
    match status {
        MemberStatus::Active => "active",
        MemberStatus::Invited => "invited",
        MemberStatus::Suspended => "suspended",
    }
}

fn parse_status(s: &str) -> Result<MemberStatus, RepositoryError> {
    match s {
        "active" => Ok(MemberStatus::Active),
        "invited" => Ok(MemberStatus::Invited),
        "suspended" => Ok(MemberStatus::Suspended),
        other => Err(RepositoryError::Query(format!("invalid status: {other}"))),
    }
}
