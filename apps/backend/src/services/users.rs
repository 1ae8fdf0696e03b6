use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::info;

use crate::auth::password;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::repos::users::{self as users_repo, User};

pub const MAX_USERNAME_CHARS: usize = 64;
pub const MAX_PASSWORD_BYTES: usize = 1024;

/// Public projection of a credential record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Trim and check a username: non-empty, at most 64 chars, no whitespace or control chars.
pub fn normalize_username(raw: &str) -> Result<String, DomainError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            "Username must not be empty",
        ));
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            format!("Username must be at most {MAX_USERNAME_CHARS} characters"),
        ));
    }
    if username
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            "Username must not contain whitespace or control characters",
        ));
    }
    Ok(username.to_string())
}

pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidPassword,
            "Password must not be empty",
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(DomainError::validation(
            ValidationKind::InvalidPassword,
            format!("Password must be at most {MAX_PASSWORD_BYTES} bytes"),
        ));
    }
    Ok(())
}

/// Create a credential record. Duplicates surface as `USERNAME_TAKEN`
/// from the unique index; nothing is written on any error path.
pub async fn register<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
    password: &str,
) -> Result<Identity, AppError> {
    let username = normalize_username(username)?;
    validate_password(password)?;

    let password_hash = password::hash_password_blocking(password.to_string()).await?;
    let user = users_repo::create_user(conn, &username, &password_hash).await?;

    info!(user_id = user.id, "User registered");
    Ok(Identity::from(&user))
}

pub async fn get_profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Identity, AppError> {
    let user = users_repo::find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, "User not found"))?;
    Ok(Identity::from(&user))
}
