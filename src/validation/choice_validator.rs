//! Choice Validator - checks CLI values against the supported choices
//!
//! # Example
//!
//! ```
//! use how2validate::validation::choice_validator::{format_service, validate_choice};
//!
//! let allowed = vec!["NPM".to_string(), "Snyk".to_string()];
//! assert_eq!(validate_choice("provider", "NPM", &allowed).unwrap(), "NPM");
//! assert!(validate_choice("provider", "npm", &allowed).is_err());
//!
//! assert_eq!(format_service("NPM Access Token"), "npm_access_token");
//! ```

use crate::core::error::H2vError;

/// Return `candidate` unchanged when it is one of `allowed`.
///
/// Matching is exact and case-sensitive. `field` names the option being
/// checked so the error can say which one failed.
pub fn validate_choice(field: &str, candidate: &str, allowed: &[String]) -> Result<String, H2vError> {
    if allowed.iter().any(|choice| choice == candidate) {
        Ok(candidate.to_string())
    } else {
        Err(H2vError::InvalidChoice {
            field: field.to_string(),
            candidate: candidate.to_string(),
            allowed: allowed.to_vec(),
        })
    }
}

/// Normalize a service name into the backend token format.
///
/// Lowercases and collapses every run of whitespace, `-` and `_` into a
/// single `_`. Leading and trailing separators are dropped.
pub fn format_service(name: &str) -> String {
    let mut token = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.trim().chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
            continue;
        }
        if pending_separator && !token.is_empty() {
            token.push('_');
        }
        pending_separator = false;
        token.extend(c.to_lowercase());
    }

    token
}
