//! Data Models
//!
//! Stored entities, request and response DTOs, and session token claims.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Access tag carried by every session token
pub const AUTH_ACCESS: &str = "auth";

// ============================================
// Stored Entities
// ============================================

/// One active session on a user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SessionToken {
    pub access: String,
    pub token: String,
}

impl SessionToken {
    /// Session entry for a freshly issued auth token
    pub fn auth(token: impl Into<String>) -> Self {
        Self {
            access: AUTH_ACCESS.to_string(),
            token: token.into(),
        }
    }
}

/// User record
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub tokens: Vec<SessionToken>,
}

impl User {
    /// Whether `token` is still one of this user's active auth sessions
    pub fn has_session(&self, token: &str) -> bool {
        self.tokens
            .iter()
            .any(|t| t.access == AUTH_ACCESS && t.token == token)
    }
}

/// Todo record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    /// Epoch milliseconds; set exactly when `completed` is true
    #[serde(rename = "completedAt")]
    pub completed_at: Option<i64>,
    #[serde(rename = "_creator")]
    pub creator_id: Uuid,
}

/// Field changes applied by a todo update
///
/// Built through [`TodoChanges::from_patch`] so that the completion fields are
/// always consistent with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoChanges {
    pub text: Option<String>,
    pub completed: bool,
    pub completed_at: Option<i64>,
}

impl TodoChanges {
    /// Apply the completion-timestamp rule to a PATCH body.
    ///
    /// Only a literal JSON `true` marks the todo completed (stamped with
    /// `now_ms`); anything else, including an absent field, clears completion.
    pub fn from_patch(patch: UpdateTodoRequest, now_ms: i64) -> Self {
        let completed = matches!(patch.completed, Some(serde_json::Value::Bool(true)));
        Self {
            text: patch.text,
            completed,
            completed_at: completed.then_some(now_ms),
        }
    }

    /// Apply these changes to an in-memory record
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(text) = &self.text {
            todo.text = text.clone();
        }
        todo.completed = self.completed;
        todo.completed_at = self.completed_at;
    }
}

// ============================================
// Request DTOs
// ============================================

/// Registration request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Create todo request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
}

/// Update todo request
///
/// `completed` is kept as raw JSON so that only a real boolean `true` counts.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, message = "Text must not be empty"))]
    pub text: Option<String>,

    pub completed: Option<serde_json::Value>,
}

// ============================================
// Response DTOs
// ============================================

/// User response (public user data without sensitive fields)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// `{ "todos": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub todos: Vec<Todo>,
}

/// `{ "todo": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoResponse {
    pub todo: Todo,
}

// ============================================
// Token Claims
// ============================================

/// Claims embedded in a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Owning user ID
    #[serde(rename = "_id")]
    pub sub: Uuid,
    /// Purpose tag, always "auth" for sessions
    pub access: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Unique token ID
    pub jti: Uuid,
}
