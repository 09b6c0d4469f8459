//! Email Validator - syntactic check for report recipients
//!
//! This is a structural filter only. It never resolves the domain.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern is valid");
}

/// Check that `candidate` looks like `local-part@domain.tld`
///
/// # Examples
///
/// ```
/// use how2validate::validation::email_validator::validate_email;
///
/// assert!(validate_email("a@b.co"));
/// assert!(!validate_email("not-an-email"));
/// assert!(!validate_email("a@b"));
/// ```
pub fn validate_email(candidate: &str) -> bool {
    EMAIL_REGEX.is_match(candidate)
}
