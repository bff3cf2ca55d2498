//! Authentication Middleware
//!
//! Gate in front of every protected route: reads the `x-auth` header, checks
//! it against the user's active sessions and stores the resolved identity in
//! request extensions for the [`AuthUser`](crate::extractors::AuthUser)
//! extractor.

use crate::error::AppError;
use crate::handlers::AppState;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Header carrying the session token, on requests and on login responses
pub const AUTH_HEADER: &str = "x-auth";

/// Require an authenticated user
pub async fn require_auth(
    State(services): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(AUTH_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned)
        .ok_or(AppError::Unauthorized)?;

    let current = services
        .users
        .resolve_session(&token)
        .await
        .map_err(|e| {
            if !matches!(e, AppError::Unauthorized) {
                tracing::error!("Session lookup failed: {}", e);
            }
            AppError::Unauthorized
        })?;

    req.extensions_mut().insert(current);

    Ok(next.run(req).await)
}
