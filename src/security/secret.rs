//! Secret handling helpers
//!
//! Secrets travel through the tool as [`SecretString`] so that they never
//! show up in `Debug` output. Anything that has to be logged goes through
//! [`redact_secret`] first.

use secrecy::{ExposeSecret, SecretString};

/// Number of leading characters left visible by [`redact_secret`]
const VISIBLE_PREFIX: usize = 5;

/// Keep the first five characters of a secret and mask the rest with `*`.
///
/// Secrets of five characters or fewer are returned as is.
///
/// # Examples
///
/// ```
/// use how2validate::security::redact_secret;
///
/// assert_eq!(redact_secret("npm_abcdef123"), "npm_a********");
/// assert_eq!(redact_secret("abc"), "abc");
/// ```
pub fn redact_secret(secret: &str) -> String {
    let total = secret.chars().count();
    if total <= VISIBLE_PREFIX {
        return secret.to_string();
    }

    let prefix: String = secret.chars().take(VISIBLE_PREFIX).collect();
    format!("{}{}", prefix, "*".repeat(total - VISIBLE_PREFIX))
}

/// Wrap a raw CLI value as a secret
pub fn to_secret(raw: &str) -> SecretString {
    SecretString::new(raw.into())
}

/// Redacted form of a wrapped secret
pub fn redact(secret: &SecretString) -> String {
    redact_secret(secret.expose_secret())
}

/// Whether a wrapped secret has no characters at all
pub fn is_empty(secret: &SecretString) -> bool {
    secret.expose_secret().is_empty()
}
