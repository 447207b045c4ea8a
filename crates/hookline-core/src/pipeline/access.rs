//! Authorization gate in front of the pipeline.
//!
//! Four ordered checks, each a hard stop: definition exists, caller is
//! an active member of the owning workspace, webhook is enabled, and the
//! permission block (if any) admits the caller. A per-user exception
//! matched by id or email decides directly; only when no exception
//! matches does the role list apply. Definitions without a permission
//! block are default-allow, which keeps definitions created before the
//! permissions feature working.

use hookline_types::error::AccessError;
use hookline_types::tier::Tier;
use hookline_types::webhook::{ExceptionAccess, WebhookDefinition, WebhookPermissions};
use hookline_types::workspace::{Caller, MemberRole, MemberStatus};
use uuid::Uuid;

use crate::repository::{WebhookRepository, WorkspaceRepository};

/// Everything authorization establishes about an invocation.
#[derive(Debug, Clone)]
pub struct AccessContext {
    pub definition: WebhookDefinition,
    pub workspace_id: Uuid,
    pub caller_role: MemberRole,
}

/// Read-only authorization over webhook and workspace storage.
#[derive(Debug, Clone)]
pub struct AccessGate<W, S> {
    webhooks: W,
    workspaces: S,
}

impl<W, S> AccessGate<W, S>
where
    W: WebhookRepository,
    S: WorkspaceRepository,
{
    pub fn new(webhooks: W, workspaces: S) -> Self {
        Self {
            webhooks,
            workspaces,
        }
    }

    /// Authorize `caller` to execute the webhook `webhook_id`.
    pub async fn authorize(
        &self,
        caller: &Caller,
        webhook_id: &Uuid,
    ) -> Result<AccessContext, AccessError> {
        let definition = self
            .webhooks
            .get_definition(webhook_id)
            .await
            .map_err(|e| AccessError::Internal(e.to_string()))?
            .ok_or(AccessError::NotFound)?;

        let membership = self
            .workspaces
            .get_membership(&definition.workspace_id, &caller.id)
            .await
            .map_err(|e| AccessError::Internal(e.to_string()))?
            .ok_or_else(|| {
                AccessError::PermissionDenied(
                    "caller is not a member of this workspace".to_string(),
                )
            })?;

        if membership.status != MemberStatus::Active {
            return Err(AccessError::PermissionDenied(
                "workspace membership is not active".to_string(),
            ));
        }

        if !definition.is_enabled {
            return Err(AccessError::FailedPrecondition(
                "webhook is disabled".to_string(),
            ));
        }

        if let Some(permissions) = &definition.permissions {
            check_permissions(permissions, caller, membership.role)?;
        }

        tracing::debug!(
            webhook_id = %webhook_id,
            caller_id = %caller.id,
            role = ?membership.role,
            "caller authorized"
        );

        Ok(AccessContext {
            workspace_id: definition.workspace_id,
            caller_role: membership.role,
            definition,
        })
    }

    /// Resolve the billing tier of the webhook's workspace owner.
    ///
    /// Every missing link (no workspace, no subscription, unknown plan)
    /// and any storage error falls back to free rather than failing the
    /// execution.
    pub async fn owner_tier(&self, workspace_id: &Uuid) -> Tier {
        match self.workspaces.get_owner_plan(workspace_id).await {
            Ok(plan) => Tier::from_plan_id(plan.as_deref()),
            Err(err) => {
                tracing::warn!(
                    workspace_id = %workspace_id,
                    error = %err,
                    "tier lookup failed, defaulting to free"
                );
                Tier::Free
            }
        }
    }
}

fn check_permissions(
    permissions: &WebhookPermissions,
    caller: &Caller,
    role: MemberRole,
) -> Result<(), AccessError> {
    let exception = permissions.user_exceptions.iter().find(|e| {
        e.user_id.as_ref() == Some(&caller.id)
            || (e.email.is_some() && e.email == caller.email)
    });

    if let Some(exception) = exception {
        return match exception.access {
            ExceptionAccess::Allow => Ok(()),
            ExceptionAccess::Deny => Err(AccessError::PermissionDenied(
                "access denied for this user".to_string(),
            )),
        };
    }

    if permissions.allowed_roles.contains(&role) {
        Ok(())
    } else {
        Err(AccessError::PermissionDenied(
            "role is not allowed to execute this webhook".to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
