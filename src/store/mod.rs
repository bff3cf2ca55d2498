//! Document Store
//!
//! The persistence seam for the `users` and `todos` collections. Every todo
//! operation is filtered by owner inside a single store call, so an absent
//! record and someone else's record look the same to callers.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::models::{SessionToken, Todo, TodoChanges, User};

use async_trait::async_trait;
use uuid::Uuid;

/// User collection
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user with an empty token list.
    ///
    /// Fails with [`AppError::EmailExists`] when the email is already taken.
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, AppError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Append a session to the user's token list
    async fn push_token(&self, user_id: Uuid, token: SessionToken) -> Result<(), AppError>;

    /// Remove every session entry matching `token`; removing nothing is not an error
    async fn pull_token(&self, user_id: Uuid, token: &str) -> Result<(), AppError>;
}

/// Todo collection
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert_todo(&self, creator_id: Uuid, text: &str) -> Result<Todo, AppError>;

    /// All todos owned by `creator_id`, in insertion order
    async fn list_todos(&self, creator_id: Uuid) -> Result<Vec<Todo>, AppError>;

    async fn find_todo(&self, id: Uuid, creator_id: Uuid) -> Result<Option<Todo>, AppError>;

    /// Hard-delete and return the removed record
    async fn delete_todo(&self, id: Uuid, creator_id: Uuid) -> Result<Option<Todo>, AppError>;

    /// Apply `changes` and return the updated record
    async fn update_todo(
        &self,
        id: Uuid,
        creator_id: Uuid,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, AppError>;
}
