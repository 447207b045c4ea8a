//! SQLite webhook definition repository.
//!
//! Definitions are stored as one JSON blob per row; the pipeline reads
//! them whole and never updates them, so columns exist only for the keys
//! queries filter on. `save_definition` backs the (external) management
//! surface and the tests.

use chrono::Utc;
use hookline_types::error::RepositoryError;
use hookline_types::webhook::WebhookDefinition;
use sqlx::Row;
use uuid::Uuid;

use hookline_core::repository::WebhookRepository;

use super::pool::DatabasePool;

/// SQLite-backed webhook definition store.
#[derive(Clone)]
pub struct SqliteWebhookRepository {
    pool: DatabasePool,
}

impl SqliteWebhookRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Insert or replace a webhook definition.
    pub async fn save_definition(
        &self,
        definition: &WebhookDefinition,
    ) -> Result<(), RepositoryError> {
        let blob = serde_json::to_string(definition)
            .map_err(|e| RepositoryError::Query(format!("unserializable definition: {e}")))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO webhooks (id, workspace_id, name, definition, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   workspace_id = excluded.workspace_id,
                   name = excluded.name,
                   definition = excluded.definition,
                   updated_at = excluded.updated_at"#,
        )
        .bind(definition.id.to_string())
        .bind(definition.workspace_id.to_string())
        .bind(&definition.name)
        .bind(blob)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

impl WebhookRepository for SqliteWebhookRepository {
    async fn get_definition(
        &self,
        id: &Uuid,
    ) -> Result<Option<WebhookDefinition>, RepositoryError> {
        let row = sqlx::query("SELECT definition FROM webhooks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let blob: String = row
            .try_get("definition")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let definition = serde_json::from_str(&blob)
            .map_err(|e| RepositoryError::Query(format!("corrupt definition blob: {e}")))?;
        Ok(Some(definition))
    }

    async fn count_for_workspace(&self, workspace_id: &Uuid) -> Result<u32, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM webhooks WHERE workspace_id = ?")
                .bind(workspace_id.to_string())
                .fetch_one(&self.pool.reader)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookline_types::webhook::HttpMethod;
    use std::collections::HashMap;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn setup_workspace(pool: &DatabasePool) -> Uuid {
        let workspace_id = Uuid::now_v7();
        sqlx::query("INSERT INTO workspaces (id, owner_id, name, created_at) VALUES (?, ?, ?, ?)")
            .bind(workspace_id.to_string())
            .bind(Uuid::now_v7().to_string())
            .bind("Test Workspace")
            .bind(Utc::now().to_rfc3339())
            .execute(&pool.writer)
            .await
            .unwrap();
        workspace_id
    }

    fn make_definition(workspace_id: Uuid) -> WebhookDefinition {
        WebhookDefinition {
            id: Uuid::now_v7(),
            workspace_id,
            created_by: Uuid::now_v7(),
            name: "notify-crm".to_string(),
            endpoint_url: "https://crm.example.com/hooks/lead".to_string(),
            http_method: HttpMethod::Post,
            is_enabled: true,
            headers: HashMap::new(),
            secure_headers: HashMap::new(),
            body_template: Some(r#"{"to":""}"#.to_string()),
            fields: Vec::new(),
            timeout_seconds: Some(10),
            permissions: None,
        }
    }

    #[tokio::test]
    async fn test_save_and_get_definition() {
        let pool = test_pool().await;
        let repo = SqliteWebhookRepository::new(pool.clone());
        let workspace_id = setup_workspace(&pool).await;
        let definition = make_definition(workspace_id);

        repo.save_definition(&definition).await.unwrap();

        let loaded = repo.get_definition(&definition.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "notify-crm");
        assert_eq!(loaded.http_method, HttpMethod::Post);
        assert_eq!(loaded.timeout_seconds, Some(10));
    }

    #[tokio::test]
    async fn test_get_unknown_definition_is_none() {
        let pool = test_pool().await;
        let repo = SqliteWebhookRepository::new(pool);
        assert!(repo.get_definition(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let pool = test_pool().await;
        let repo = SqliteWebhookRepository::new(pool.clone());
        let workspace_id = setup_workspace(&pool).await;
        let mut definition = make_definition(workspace_id);

        repo.save_definition(&definition).await.unwrap();
        definition.is_enabled = false;
        repo.save_definition(&definition).await.unwrap();

        let loaded = repo.get_definition(&definition.id).await.unwrap().unwrap();
        assert!(!loaded.is_enabled);
        assert_eq!(repo.count_for_workspace(&workspace_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_count_for_workspace() {
        let pool = test_pool().await;
        let repo = SqliteWebhookRepository::new(pool.clone());
        let workspace_id = setup_workspace(&pool).await;
        let other_workspace = setup_workspace(&pool).await;

        repo.save_definition(&make_definition(workspace_id)).await.unwrap();
        repo.save_definition(&make_definition(workspace_id)).await.unwrap();
        repo.save_definition(&make_definition(other_workspace)).await.unwrap();

        assert_eq!(repo.count_for_workspace(&workspace_id).await.unwrap(), 2);
        assert_eq!(repo.count_for_workspace(&other_workspace).await.unwrap(), 1);
    }
}
