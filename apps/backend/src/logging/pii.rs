use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Regex patterns for secrets that must never reach the logs.
pub struct PiiRegexRegistry;

impl PiiRegexRegistry {
    /// Compact JWS: three base64url segments joined by dots
    pub fn jwt() -> &'static Regex {
        static JWT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\beyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*").unwrap()
        });
        &JWT_REGEX
    }

    /// PHC-formatted argon2 hash
    pub fn argon2_hash() -> &'static Regex {
        static ARGON2_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\$argon2(?:id|i|d)\$[A-Za-z0-9$=,+/.]+").unwrap()
        });
        &ARGON2_REGEX
    }

    /// Base64-like opaque token (≥16 chars)
    pub fn base64_token() -> &'static Regex {
        static BASE64_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9+/]{16,}={0,2}\b").unwrap()
        });
        &BASE64_TOKEN_REGEX
    }
}

/// Masks bearer tokens, password hashes and long opaque tokens.
///
/// JWTs go first so their segments are replaced as a unit.
pub fn redact(input: &str) -> String {
    let without_jwt = PiiRegexRegistry::jwt().replace_all(input, "[REDACTED_JWT]");
    let without_hash =
        PiiRegexRegistry::argon2_hash().replace_all(&without_jwt, "[REDACTED_HASH]");
    PiiRegexRegistry::base64_token()
        .replace_all(&without_hash, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Display wrapper that applies [`redact`] when formatted.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
