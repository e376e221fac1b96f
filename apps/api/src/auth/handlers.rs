//! Axum route handlers for the Auth API.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::auth::service::{login, signup, AuthResponse, LoginRequest, SignupRequest};
use crate::auth::extractor::bearer_token;
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::SessionUser;
use crate::state::AppState;

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = signup(state.store.as_ref(), state.sessions.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = login(state.store.as_ref(), state.sessions.as_ref(), request).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Always 204: logging out with an unknown or already revoked token is not an error.
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.revoke(token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(current: CurrentUser) -> Json<SessionUser> {
    Json(current.user)
}
