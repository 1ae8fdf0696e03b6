//! Login and bearer-token authentication.
//!
//! Expected failures come back as [`AuthOutcome::Rejected`]; `Err` is kept
//! for infrastructure faults.

use std::time::SystemTime;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::debug;

use crate::auth::{jwt, password};
use crate::error::AppError;
use crate::repos::users as users_repo;
use crate::services::users::Identity;
use crate::state::security_config::SecurityConfig;
use crate::trace_ctx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    InvalidCredentials,
    InvalidToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome<T> {
    Accepted(T),
    Rejected(Rejection),
}

impl<T> AuthOutcome<T> {
    /// Collapse every rejection into the single generic 401.
    pub fn into_result(self) -> Result<T, AppError> {
        match self {
            AuthOutcome::Accepted(value) => Ok(value),
            AuthOutcome::Rejected(reason) => {
                debug!(trace_id = %trace_ctx::trace_id(), ?reason, "Authentication rejected");
                Err(AppError::unauthorized())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
}

pub async fn login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    security: &SecurityConfig,
    username: &str,
    password: &str,
    now: SystemTime,
) -> Result<AuthOutcome<IssuedToken>, AppError> {
    let user = users_repo::find_by_username(conn, username.trim()).await?;

    // Unknown users still pay for one verification.
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let matches = password::verify_password_blocking(password.to_string(), stored_hash).await?;

    let user = match user {
        Some(user) if matches => user,
        _ => return Ok(AuthOutcome::Rejected(Rejection::InvalidCredentials)),
    };

    let access_token = jwt::issue(&user.username, now, security)?;
    debug!(user_id = user.id, "Access token issued");

    Ok(AuthOutcome::Accepted(IssuedToken {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

pub async fn authenticate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    security: &SecurityConfig,
    token: &str,
    now: SystemTime,
) -> Result<AuthOutcome<Identity>, AppError> {
    let claims = match jwt::verify(token, now, security) {
        Ok(claims) => claims,
        Err(rejection) => {
            debug!(trace_id = %trace_ctx::trace_id(), ?rejection, "Token rejected");
            return Ok(AuthOutcome::Rejected(Rejection::InvalidToken));
        }
    };

    match users_repo::find_by_username(conn, &claims.sub).await? {
        Some(user) => Ok(AuthOutcome::Accepted(Identity::from(&user))),
        None => {
            debug!(trace_id = %trace_ctx::trace_id(), "Token subject no longer exists");
            Ok(AuthOutcome::Rejected(Rejection::InvalidToken))
        }
    }
}
