//! Error handling for secret validation
//!
//! This module provides the error taxonomy of the tool with stable codes and
//! recovery guidance, using the thiserror crate.

use thiserror::Error;

/// Main error type for how2validate operations
#[derive(Error, Debug)]
pub enum H2vError {
    // Input errors (raised while parsing, before dispatch)
    #[error("Invalid {field}: '{candidate}'. Choose from {}.", .allowed.join(", "))]
    InvalidChoice {
        field: String,
        candidate: String,
        allowed: Vec<String>,
    },

    #[error("Invalid email address provided for --report option.")]
    InvalidEmail { candidate: String },

    #[error("Unknown provider: '{provider}'")]
    UnknownProvider { provider: String },

    #[error("Missing required arguments: -Provider, -Service, -Secret")]
    MissingRequiredArguments,

    // Collaborator errors (raised during dispatch)
    #[error("Tool update failed: {message}")]
    UpdateFailed { message: String },

    #[error("[{service}] validation backend error: {message}")]
    BackendError { service: String, message: String },

    // Ambient errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Token manager error: {0}")]
    TokenManagerError(String),

    #[error("Command execution error: {0}")]
    CommandError(String),
}

impl H2vError {
    /// Whether the error was caused by what the user typed
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidChoice { .. }
                | Self::InvalidEmail { .. }
                | Self::UnknownProvider { .. }
                | Self::MissingRequiredArguments
        )
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::InvalidChoice { .. } | Self::UnknownProvider { .. } => vec![
                "Run with -secretscope to list supported providers and services",
                "Check the spelling and case of the value",
            ],
            Self::InvalidEmail { .. } => {
                vec!["Provide an address of the form name@example.com"]
            }
            Self::MissingRequiredArguments => vec![
                "Pass --provider, --service and --secret together",
                "Use '-h' or '--help' for usage information",
            ],
            Self::UpdateFailed { .. } => vec![
                "Check that cargo is installed and on PATH",
                "Install the latest version manually with cargo install",
            ],
            Self::BackendError { .. } => vec![
                "Check your network connection",
                "Run with -secretscope to confirm the service is supported",
            ],
            Self::ConfigError(_) => vec![
                "Check the .how2validate.yaml or .how2validate.toml file",
                "Check the HOW2VALIDATE_* environment variables",
            ],
            Self::TokenManagerError(_) => vec![
                "Check that the token manager file exists and is valid JSON",
                "Unset HOW2VALIDATE_TOKEN_MANAGER to use the built-in service list",
            ],
            Self::CommandError(_) => {
                vec!["Check the command output for details"]
            }
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidChoice { .. } => "INVALID_CHOICE",
            Self::InvalidEmail { .. } => "INVALID_EMAIL",
            Self::UnknownProvider { .. } => "UNKNOWN_PROVIDER",
            Self::MissingRequiredArguments => "MISSING_REQUIRED_ARGUMENTS",
            Self::UpdateFailed { .. } => "UPDATE_FAILED",
            Self::BackendError { .. } => "BACKEND_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::TokenManagerError(_) => "TOKEN_MANAGER_ERROR",
            Self::CommandError(_) => "COMMAND_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_choice_lists_allowed_values() {
        let error = H2vError::InvalidChoice {
            field: "provider".to_string(),
            candidate: "gitlab".to_string(),
            allowed: vec!["npm".to_string(), "snyk".to_string()],
        };

        assert_eq!(
            error.to_string(),
            "Invalid provider: 'gitlab'. Choose from npm, snyk."
        );
        assert!(error.is_user_error());
        assert_eq!(error.code(), "INVALID_CHOICE");
    }

    #[test]
    fn test_invalid_email_message() {
        let error = H2vError::InvalidEmail {
            candidate: "bad-email".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Invalid email address provided for --report option."
        );
        assert!(error.is_user_error());
    }

    #[test]
    fn test_missing_required_arguments() {
        let error = H2vError::MissingRequiredArguments;

        assert!(error.to_string().contains("-Provider, -Service, -Secret"));
        let actions = error.suggested_actions();
        assert!(actions.iter().any(|a| a.contains("--help")));
    }

    #[test]
    fn test_backend_error_carries_service() {
        let error = H2vError::BackendError {
            service: "npm_access_token".to_string(),
            message: "connection refused".to_string(),
        };

        assert!(!error.is_user_error());
        assert_eq!(error.code(), "BACKEND_ERROR");
        let display = error.to_string();
        assert!(display.contains("npm_access_token"));
        assert!(display.contains("connection refused"));
    }

    #[test]
    fn test_update_failed_is_not_user_error() {
        let error = H2vError::UpdateFailed {
            message: "cargo not found".to_string(),
        };

        assert!(!error.is_user_error());
        assert_eq!(error.code(), "UPDATE_FAILED");
        assert!(error.suggested_actions().len() >= 2);
    }

    #[test]
    fn test_config_error_code() {
        let error = H2vError::ConfigError("bad yaml".to_string());
        assert_eq!(error.code(), "CONFIG_ERROR");
        assert!(error.to_string().contains("bad yaml"));
    }
}
