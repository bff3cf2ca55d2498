//! In-memory Store
//!
//! Keeps both collections behind a single lock. Used by the test suite and by
//! `STORE=memory` development runs.

use super::{TodoStore, UserStore};
use crate::error::AppError;
use crate::models::{SessionToken, Todo, TodoChanges, User};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    todos: Vec<Todo>,
}

/// Store holding all records in process memory
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a todo with explicit fields, bypassing creation defaults
    pub async fn seed_todo(&self, todo: Todo) {
        self.inner.write().await.todos.push(todo);
    }

    /// Number of stored todos across all owners
    pub async fn todo_count(&self) -> usize {
        self.inner.read().await.todos.len()
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;

        if inner.users.iter().any(|u| u.email == email) {
            return Err(AppError::EmailExists);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            tokens: Vec::new(),
        };
        inner.users.push(user.clone());

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn push_token(&self, user_id: Uuid, token: SessionToken) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;

        match inner.users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.tokens.push(token);
                Ok(())
            }
            None => Err(AppError::Database(format!("user {} does not exist", user_id))),
        }
    }

    async fn pull_token(&self, user_id: Uuid, token: &str) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;

        if let Some(user) = inner.users.iter_mut().find(|u| u.id == user_id) {
            user.tokens.retain(|t| t.token != token);
        }

        Ok(())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert_todo(&self, creator_id: Uuid, text: &str) -> Result<Todo, AppError> {
        let todo = Todo {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
            completed_at: None,
            creator_id,
        };
        self.inner.write().await.todos.push(todo.clone());

        Ok(todo)
    }

    async fn list_todos(&self, creator_id: Uuid) -> Result<Vec<Todo>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .todos
            .iter()
            .filter(|t| t.creator_id == creator_id)
            .cloned()
            .collect())
    }

    async fn find_todo(&self, id: Uuid, creator_id: Uuid) -> Result<Option<Todo>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .todos
            .iter()
            .find(|t| t.id == id && t.creator_id == creator_id)
            .cloned())
    }

    async fn delete_todo(&self, id: Uuid, creator_id: Uuid) -> Result<Option<Todo>, AppError> {
        let mut inner = self.inner.write().await;

        let position = inner
            .todos
            .iter()
            .position(|t| t.id == id && t.creator_id == creator_id);

        Ok(position.map(|index| inner.todos.remove(index)))
    }

    async fn update_todo(
        &self,
        id: Uuid,
        creator_id: Uuid,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, AppError> {
        let mut inner = self.inner.write().await;

        Ok(inner
            .todos
            .iter_mut()
            .find(|t| t.id == id && t.creator_id == creator_id)
            .map(|todo| {
                changes.apply_to(todo);
                todo.clone()
            }))
    }
}
