use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use super::claims::Claims;
use crate::errors::ErrorCode;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Why a token was refused. Logged, never sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    BadSignature,
    Malformed,
    Expired,
}

fn epoch_secs(now: SystemTime) -> Option<i64> {
    now.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_secs()).ok())
}

/// Sign a token for `subject` with `iat = now` and `exp = now + security.token_ttl`.
pub fn issue(subject: &str, now: SystemTime, security: &SecurityConfig) -> Result<String, AppError> {
    if subject.trim().is_empty() {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "token subject must not be empty",
        ));
    }

    let iat = epoch_secs(now).ok_or_else(|| AppError::internal("system clock before epoch"))?;
    let ttl = i64::try_from(security.token_ttl.as_secs())
        .map_err(|_| AppError::config("token TTL out of range"))?;

    let claims = Claims {
        sub: subject.to_string(),
        iat,
        exp: iat.saturating_add(ttl),
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("failed to encode token: {e}")))
}

/// Check signature, algorithm, claim shape and expiry against `now`.
///
/// Expiry uses zero leeway: a token is dead at `exp`, not after it.
pub fn verify(token: &str, now: SystemTime, security: &SecurityConfig) -> Result<Claims, TokenRejection> {
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["sub", "iat", "exp"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => TokenRejection::BadSignature,
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        _ => TokenRejection::Malformed,
    })?;

    if claims.sub.trim().is_empty() {
        return Err(TokenRejection::Malformed);
    }

    // A clock before the epoch cannot prove freshness.
    let now = epoch_secs(now).ok_or(TokenRejection::Expired)?;
    if claims.exp <= now {
        return Err(TokenRejection::Expired);
    }

    Ok(claims)
}
