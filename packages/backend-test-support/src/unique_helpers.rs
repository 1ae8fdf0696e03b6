//! Test helpers for generating unique test data
//!
//! ULID suffixes keep tests isolated when they share a database.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("user");
/// let id2 = unique_str("user");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("user-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique username that satisfies registration rules
/// (no whitespace, at most 64 characters).
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_username;
///
/// let name = unique_username("alice");
/// assert!(name.starts_with("alice_"));
/// assert!(name.len() <= 64);
/// ```
pub fn unique_username(prefix: &str) -> String {
    let prefix: String = prefix.chars().take(32).collect();
    format!("{}_{}", prefix, Ulid::new().to_string().to_lowercase())
}
