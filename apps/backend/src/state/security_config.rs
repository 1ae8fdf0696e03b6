use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::error::AppError;

/// Secrets must be at least this long.
pub const MIN_SECRET_LEN: usize = 16;

const DEFAULT_TTL_MINUTES: u64 = 30;

/// Token signing settings shared by issue and verify.
#[derive(Clone)]
pub struct SecurityConfig {
    /// HMAC secret for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// One of HS256, HS384, HS512
    pub algorithm: Algorithm,
    /// Lifetime embedded as `exp - iat`
    pub token_ttl: Duration,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>, algorithm: Algorithm, token_ttl: Duration) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm,
            token_ttl,
        }
    }

    /// Reads `SECRET_KEY`, `ALGORITHM` and `ACCESS_TOKEN_EXPIRE_MINUTES`.
    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var("SECRET_KEY")
            .map_err(|_| AppError::config("SECRET_KEY must be set"))?;
        let algorithm = match std::env::var("ALGORITHM") {
            Ok(raw) => parse_algorithm(&raw)?,
            Err(_) => Algorithm::HS256,
        };
        let minutes = match std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::config(format!(
                    "ACCESS_TOKEN_EXPIRE_MINUTES must be a positive integer, got '{raw}'"
                ))
            })?,
            Err(_) => DEFAULT_TTL_MINUTES,
        };
        if minutes == 0 {
            return Err(AppError::config(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be greater than zero",
            ));
        }

        let ttl_secs = minutes.checked_mul(60).ok_or_else(|| {
            AppError::config(format!(
                "ACCESS_TOKEN_EXPIRE_MINUTES is too large, got {minutes}"
            ))
        })?;

        Self::new(secret.into_bytes(), algorithm, Duration::from_secs(ttl_secs)).validated()
    }

    /// Rejects secrets shorter than [`MIN_SECRET_LEN`] and non-HMAC algorithms.
    pub fn validated(self) -> Result<Self, AppError> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(AppError::config(format!(
                "SECRET_KEY must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if !matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AppError::config("ALGORITHM must be HS256, HS384 or HS512"));
        }
        Ok(self)
    }

    /// Same config with a different TTL.
    pub fn with_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    /// Random 32-byte secret, HS256, default TTL.
    pub fn for_tests() -> Self {
        let secret = format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple());
        Self::new(
            secret.into_bytes(),
            Algorithm::HS256,
            Duration::from_secs(DEFAULT_TTL_MINUTES * 60),
        )
    }
}

fn parse_algorithm(raw: &str) -> Result<Algorithm, AppError> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(AppError::config(format!(
            "unsupported ALGORITHM '{other}'; expected HS256, HS384 or HS512"
        ))),
    }
}
