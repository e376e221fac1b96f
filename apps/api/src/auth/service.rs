use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, validate_password, verify_password};
use crate::auth::session::SessionStore;
use crate::errors::AppError;
use crate::models::{SessionUser, User, UserRole};
use crate::store::Store;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: SessionUser,
}

/// Emails are compared and stored trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Loose `local@domain.tld` shape check; deliverability is not our concern.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = email
        .split_once('@')
        .map(|(local, domain)| {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.chars().any(char::is_whitespace)
        })
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("'{email}' is not a valid email address")))
    }
}

pub async fn signup(
    store: &dyn Store,
    sessions: &dyn SessionStore,
    request: SignupRequest,
) -> Result<AuthResponse, AppError> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    let email = normalize_email(&request.email);
    validate_email(&email)?;
    validate_password(&request.password)?;

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        name,
        email,
        role: request.role,
        password_hash: hash_password(&request.password).await?,
        created_at: now,
        updated_at: now,
    };
    store.insert_user(&user).await?;
    info!("Registered {} user {}", user.role.as_str(), user.id);

    let session_user = SessionUser::from(&user);
    let token = sessions.create(&session_user).await?;
    Ok(AuthResponse {
        token,
        user: session_user,
    })
}

pub async fn login(
    store: &dyn Store,
    sessions: &dyn SessionStore,
    request: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&request.email);
    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&request.password, &user.password_hash).await? {
        return Err(AppError::InvalidCredentials);
    }

    let session_user = SessionUser::from(&user);
    let token = sessions.create(&session_user).await?;
    info!("User {} signed in", user.id);
    Ok(AuthResponse {
        token,
        user: session_user,
    })
}
