use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::errors::AppError;
use crate::models::{SessionUser, UserRole};
use crate::state::AppState;

/// The signed-in caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: SessionUser,
}

impl CurrentUser {
    /// Rejects callers whose role differs from `role` with `Forbidden`.
    pub fn require(&self, role: UserRole) -> Result<&SessionUser, AppError> {
        if self.user.role == role {
            Ok(&self.user)
        } else {
            Err(AppError::Forbidden)
        }
    }
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let user = state
            .sessions
            .get(token)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(CurrentUser { user })
    }
}
