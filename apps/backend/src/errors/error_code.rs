//! Error codes for the Parley backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code is SCREAMING_SNAKE_CASE and maps 1:1 to the string that
//! appears in HTTP responses.

use core::fmt;

/// Centralized error codes for the Parley backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Credentials or bearer token could not be validated
    Unauthorized,

    // Request Validation
    /// General validation error
    ValidationError,
    /// Malformed request body
    BadRequest,
    /// Username violates registration rules
    InvalidUsername,
    /// Password violates registration rules
    InvalidPassword,
    /// Generation prompt empty or too long
    InvalidPrompt,
    /// Generation sampling parameters out of range
    InvalidGenerationParams,

    // Resource Not Found
    /// User not found
    UserNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Username already registered
    UsernameTaken,
    /// General conflict
    Conflict,

    // Storage
    DbError,
    DbUnavailable,
    DbTimeout,

    // Text generation upstream
    /// No generator configured or upstream unreachable
    GenerationUnavailable,
    /// Upstream answered with an error or an unreadable body
    GenerationFailed,

    Internal,
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidPrompt => "INVALID_PROMPT",
            Self::InvalidGenerationParams => "INVALID_GENERATION_PARAMS",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",

            Self::GenerationUnavailable => "GENERATION_UNAVAILABLE",
            Self::GenerationFailed => "GENERATION_FAILED",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
