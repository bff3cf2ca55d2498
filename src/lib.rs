//! Todo API
//!
//! Authenticated per-user todo service providing:
//! - User registration and email/password login
//! - Signed session tokens, revocable per session
//! - Argon2id password hashing
//! - Owner-scoped create/read/update/delete of todos
//!
//! # Configuration
//!
//! All configuration is loaded from environment variables:
//! - `JWT_SECRET` - Secret key for signing session tokens (required, min 32 chars)
//! - `DATABASE_URL` - PostgreSQL connection string (required for `STORE=postgres`)
//! - `STORE` - `postgres` (default) or `memory`
//! - `HOST` / `PORT` - Listen address (default: `0.0.0.0:3000`)
//! - `MIN_PASSWORD_LENGTH` - Password policy (default: 6)
//!
//! # Usage
//!
//! ```rust,ignore
//! use todo_api::{create_app, AppConfig, AppServices, store::MemoryStore};
//!
//! let config = AppConfig::from_env()?;
//! let services = AppServices::new(Arc::new(MemoryStore::new()), &config)?;
//! let app = create_app(Arc::new(services));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

// Re-export commonly used types
pub use config::{AppConfig, StoreKind};
pub use error::AppError;
pub use extractors::{AuthUser, JsonBody};
pub use handlers::AppState;
pub use models::*;
pub use service::{AppServices, CurrentUser};

use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the full application router with request tracing
pub fn create_app(services: AppState) -> Router {
    handlers::create_routes(services).layer(TraceLayer::new_for_http())
}
