//! HTTP Handlers
//!
//! Route table for the API. Todo routes and `/users/me*` sit behind the
//! auth gate; registration and login are public.

pub mod todos;
pub mod users;

use crate::error::AppError;
use crate::middleware;
use crate::service::AppServices;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use uuid::Uuid;

/// Shared service state
pub type AppState = Arc<AppServices>;

/// Create all API routes
pub fn create_routes(services: AppState) -> Router {
    // Public routes (no authentication required)
    let public = Router::new()
        .route("/users", post(users::register))
        .route("/users/login", post(users::login));

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/todos", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/todos/:id",
            get(todos::get_todo)
                .delete(todos::delete_todo)
                .patch(todos::update_todo),
        )
        .route("/users/me", get(users::get_current_user))
        .route("/users/me/token", delete(users::logout))
        .layer(axum_middleware::from_fn_with_state(
            services.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(services)
}

/// Parse a record id from the path; anything malformed is simply not found
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}
