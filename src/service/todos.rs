//! Todo Service
//!
//! Owner-scoped todo operations. `None` means "absent or not yours"; the two
//! cases are never told apart.

use crate::error::AppError;
use crate::models::{Todo, TodoChanges, UpdateTodoRequest};
use crate::store::TodoStore;

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Todo entity manager
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Create a todo owned by `owner_id`
    pub async fn create(&self, owner_id: Uuid, text: &str) -> Result<Todo, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Text is required".to_string()));
        }

        let todo = self.store.insert_todo(owner_id, text).await?;

        tracing::debug!(todo_id = %todo.id, owner_id = %owner_id, "Todo created");
        Ok(todo)
    }

    /// List every todo of an owner in insertion order
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Todo>, AppError> {
        self.store.list_todos(owner_id).await
    }

    pub async fn find_one(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Todo>, AppError> {
        self.store.find_todo(id, owner_id).await
    }

    /// Hard-delete a todo, returning the removed record
    pub async fn remove(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Todo>, AppError> {
        let removed = self.store.delete_todo(id, owner_id).await?;

        if removed.is_some() {
            tracing::debug!(todo_id = %id, owner_id = %owner_id, "Todo deleted");
        }
        Ok(removed)
    }

    /// Update text and completion state.
    ///
    /// Unless the request sets `completed` to `true`, completion is cleared,
    /// even when only the text changes.
    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        mut req: UpdateTodoRequest,
    ) -> Result<Option<Todo>, AppError> {
        req.text = req.text.map(|text| text.trim().to_string());
        req.validate()?;

        let changes = TodoChanges::from_patch(req, Utc::now().timestamp_millis());
        self.store.update_todo(id, owner_id, &changes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn service() -> (TodoService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (TodoService::new(store.clone()), store)
    }

    fn patch(body: serde_json::Value) -> UpdateTodoRequest {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let (service, _) = service();
        let owner = Uuid::new_v4();

        let todo = service.create(owner, "  buy milk  ").await.unwrap();
        assert_eq!(todo.text, "buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.completed_at, None);
        assert_eq!(todo.creator_id, owner);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_text() {
        let (service, store) = service();

        assert!(matches!(
            service.create(Uuid::new_v4(), "   ").await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(store.todo_count().await, 0);
    }

    #[tokio::test]
    async fn test_other_owner_sees_nothing() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let todo = service.create(owner, "private").await.unwrap();

        assert!(service.find_one(todo.id, stranger).await.unwrap().is_none());
        assert!(service
            .update(todo.id, stranger, patch(json!({ "completed": true })))
            .await
            .unwrap()
            .is_none());
        assert!(service.remove(todo.id, stranger).await.unwrap().is_none());
        assert!(service.list_by_owner(stranger).await.unwrap().is_empty());

        let untouched = service.find_one(todo.id, owner).await.unwrap().unwrap();
        assert_eq!(untouched, todo);
    }

    #[tokio::test]
    async fn test_update_completion_rule() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let todo = service.create(owner, "task").await.unwrap();

        let done = service
            .update(todo.id, owner, patch(json!({ "completed": true, "text": "updated" })))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.text, "updated");
        assert!(done.completed);
        assert!(done.completed_at.is_some());

        // Text-only updates clear completion as well.
        let text_only = service
            .update(todo.id, owner, patch(json!({ "text": "renamed" })))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(text_only.text, "renamed");
        assert!(!text_only.completed);
        assert_eq!(text_only.completed_at, None);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_text() {
        let (service, _) = service();
        let owner = Uuid::new_v4();
        let todo = service.create(owner, "task").await.unwrap();

        assert!(matches!(
            service.update(todo.id, owner, patch(json!({ "text": "  " }))).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_returns_deleted_record() {
        let (service, store) = service();
        let owner = Uuid::new_v4();
        let todo = service.create(owner, "task").await.unwrap();

        let removed = service.remove(todo.id, owner).await.unwrap();
        assert_eq!(removed, Some(todo.clone()));
        assert_eq!(store.todo_count().await, 0);
        assert!(service.remove(todo.id, owner).await.unwrap().is_none());
    }
}
