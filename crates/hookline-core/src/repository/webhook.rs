//! Webhook definition repository trait.
//!
//! The pipeline only reads definitions; creation and editing belong to
//! the surrounding application. Uses native async fn in traits (Rust 2024
//! edition, no async_trait macro).

use hookline_types::error::RepositoryError;
use hookline_types::webhook::WebhookDefinition;
use uuid::Uuid;

/// Read-only storage interface for webhook definitions.
pub trait WebhookRepository: Send + Sync {
    /// Load a webhook definition by its UUID.
    fn get_definition(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<WebhookDefinition>, RepositoryError>> + Send;

    /// Count webhook definitions in a workspace (tier quota checks).
    fn count_for_workspace(
        &self,
        workspace_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u32, RepositoryError>> + Send;
}
