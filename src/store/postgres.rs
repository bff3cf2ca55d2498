//! PostgreSQL Store
//!
//! sqlx-backed implementation of the document store. The token list of a
//! user lives in `user_tokens`, ordered by insertion.

use super::{TodoStore, UserStore};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{SessionToken, Todo, TodoChanges, User};

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const TODO_COLUMNS: &str = "id, text, completed, completed_at, creator_id";

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
}

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Connect using `DATABASE_URL` and pool settings from configuration
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;

        let db = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(url)
            .await?;

        Ok(Self::new(db))
    }

    /// Create the `users`, `user_tokens` and `todos` tables if missing
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        tracing::info!("Running database migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                email VARCHAR(255) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ DEFAULT NOW()
            );
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_tokens (
                seq BIGSERIAL PRIMARY KEY,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                access VARCHAR(32) NOT NULL,
                token TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_user_tokens_user ON user_tokens(user_id);")
            .execute(&self.db)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                seq BIGSERIAL UNIQUE,
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                text TEXT NOT NULL CHECK (length(text) > 0),
                completed BOOLEAN NOT NULL DEFAULT FALSE,
                completed_at BIGINT,
                creator_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_todos_creator ON todos(creator_id, seq);")
            .execute(&self.db)
            .await?;

        tracing::info!("Database migrations completed successfully");
        Ok(())
    }

    async fn load_tokens(&self, user_id: Uuid) -> Result<Vec<SessionToken>, AppError> {
        let tokens = sqlx::query_as::<_, SessionToken>(
            "SELECT access, token FROM user_tokens WHERE user_id = $1 ORDER BY seq",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(tokens)
    }

    async fn hydrate(&self, row: Option<UserRow>) -> Result<Option<User>, AppError> {
        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let tokens = self.load_tokens(row.id).await?;
        Ok(Some(User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            tokens,
        }))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        // Unique violations convert to AppError::EmailExists
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await?;

        Ok(User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            tokens: Vec::new(),
        })
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        self.hydrate(row).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        self.hydrate(row).await
    }

    async fn push_token(&self, user_id: Uuid, token: SessionToken) -> Result<(), AppError> {
        sqlx::query("INSERT INTO user_tokens (user_id, access, token) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(&token.access)
            .bind(&token.token)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn pull_token(&self, user_id: Uuid, token: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM user_tokens WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(user_id = %user_id, "No session token to remove");
        }

        Ok(())
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn insert_todo(&self, creator_id: Uuid, text: &str) -> Result<Todo, AppError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (text, creator_id) VALUES ($1, $2) RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(text)
        .bind(creator_id)
        .fetch_one(&self.db)
        .await?;

        Ok(todo)
    }

    async fn list_todos(&self, creator_id: Uuid) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE creator_id = $1 ORDER BY seq",
            TODO_COLUMNS
        ))
        .bind(creator_id)
        .fetch_all(&self.db)
        .await?;

        Ok(todos)
    }

    async fn find_todo(&self, id: Uuid, creator_id: Uuid) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE id = $1 AND creator_id = $2",
            TODO_COLUMNS
        ))
        .bind(id)
        .bind(creator_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(todo)
    }

    async fn delete_todo(&self, id: Uuid, creator_id: Uuid) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "DELETE FROM todos WHERE id = $1 AND creator_id = $2 RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(id)
        .bind(creator_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(todo)
    }

    async fn update_todo(
        &self,
        id: Uuid,
        creator_id: Uuid,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            r#"
            UPDATE todos SET
                text = COALESCE($3, text),
                completed = $4,
                completed_at = $5
            WHERE id = $1 AND creator_id = $2
            RETURNING {}
            "#,
            TODO_COLUMNS
        ))
        .bind(id)
        .bind(creator_id)
        .bind(changes.text.as_deref())
        .bind(changes.completed)
        .bind(changes.completed_at)
        .fetch_optional(&self.db)
        .await?;

        Ok(todo)
    }
}
