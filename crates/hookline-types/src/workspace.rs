//! Workspace membership types.
//!
//! The surrounding application owns workspace CRUD; the pipeline only
//! reads membership records to authorize callers and follows the
//! workspace owner to resolve the billing tier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A workspace (team) that owns webhooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: Uuid,
    /// The owner's subscription plan governs execution limits for every
    /// member (shared-team billing).
    pub owner_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One user's membership in a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceMember {
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: MemberRole,
    pub status: MemberStatus,
}

/// Role of a member within a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

/// Lifecycle status of a membership. Only `Active` members may execute
/// webhooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Invited,
    Suspended,
}

/// The authenticated identity invoking the pipeline, resolved upstream.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: Uuid,
    pub email: Option<String>,
}

impl Caller {
    pub fn new(id: Uuid) -> Self {
        Self { id, email: None }
    }

    pub fn with_email(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: Some(email.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_role_serde() {
        assert_eq!(serde_json::to_value(MemberRole::Owner).unwrap(), json!("owner"));
        let role: MemberRole = serde_json::from_value(json!("admin")).unwrap();
        assert_eq!(role, MemberRole::Admin);
    }

    #[test]
    fn test_member_status_serde() {
        assert_eq!(
            serde_json::to_value(MemberStatus::Suspended).unwrap(),
            json!("suspended")
        );
    }
}
