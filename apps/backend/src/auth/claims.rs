//! Claims carried by backend-issued access tokens.

use serde::{Deserialize, Serialize};

/// Fixed claim set. All fields are required when decoding.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Username the token was issued to
    pub sub: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch); always `iat + ttl`
    pub exp: i64,
}
