//! User Handlers

use super::AppState;
use crate::error::AppError;
use crate::extractors::{AuthUser, JsonBody};
use crate::middleware::AUTH_HEADER;
use crate::models::*;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

/// POST /users
///
/// Register and start a session; the token is returned in `x-auth`
pub async fn register(
    State(services): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = services.users.register(req).await?;
    let token = services.users.issue_session(&user).await?;

    Ok(([(AUTH_HEADER, token)], Json(UserResponse::from(user))))
}

/// POST /users/login
pub async fn login(
    State(services): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = services
        .users
        .authenticate(&req.email, &req.password)
        .await?;
    let token = services.users.issue_session(&user).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(([(AUTH_HEADER, token)], Json(UserResponse::from(user))))
}

/// GET /users/me
pub async fn get_current_user(AuthUser(current): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(current.user))
}

/// DELETE /users/me/token
///
/// Revoke the session that made this request
pub async fn logout(
    State(services): State<AppState>,
    AuthUser(current): AuthUser,
) -> Result<StatusCode, AppError> {
    services
        .users
        .revoke_session(&current.user, &current.token)
        .await?;

    Ok(StatusCode::OK)
}
