//! Core traits and types for secret validation
//!
//! This module defines the collaborator interfaces the front end talks to
//! (choice registry, version information, update service, validation
//! backend) and the outcome types they exchange.

use crate::core::error::H2vError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

// ============================================================================
// Secret status
// ============================================================================

/// Whether a secret is currently usable against its service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretState {
    Active,
    Inactive,
}

impl SecretState {
    /// Human wording used in status messages
    pub fn describe(&self) -> &'static str {
        match self {
            SecretState::Active => "active and operational",
            SecretState::Inactive => "inactive and not operational",
        }
    }

    /// Configured display label for this state
    pub fn label<'a>(&self, info: &'a dyn VersionInfo) -> &'a str {
        match self {
            SecretState::Active => info.active_status_label(),
            SecretState::Inactive => info.inactive_status_label(),
        }
    }
}

/// Status reported by a validation backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretStatus {
    pub service: String,
    pub state: SecretState,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    pub timestamp: DateTime<Utc>,
}

impl SecretStatus {
    /// Build a status with the standard message.
    ///
    /// Response data is only kept (and appended to the message) when
    /// `show_response` is set.
    pub fn new(
        service: &str,
        state: SecretState,
        show_response: bool,
        response_data: Option<String>,
    ) -> Self {
        let response = if show_response { response_data } else { None };

        let mut message = format!(
            "The provided secret '{}' is currently {}.",
            service,
            state.describe()
        );
        if let Some(data) = &response {
            message.push_str(&format!(" Here is the additional response data:\n{}", data));
        }

        Self {
            service: service.to_string(),
            state,
            message,
            response,
            report: None,
            http_status: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_report(mut self, recipient: Option<&str>) -> Self {
        self.report = recipient.map(str::to_string);
        self
    }

    pub fn is_active(&self) -> bool {
        self.state == SecretState::Active
    }
}

// ============================================================================
// Validation outcome
// ============================================================================

/// Why a validation request did not produce a status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailureReason {
    BadProvider { provider: String },
    BadService { service: String },
    Backend { service: String, message: String },
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::BadProvider { provider } => {
                write!(f, "provider '{}' is not supported", provider)
            }
            FailureReason::BadService { service } => {
                write!(f, "service '{}' is not supported", service)
            }
            FailureReason::Backend { service, message } => {
                write!(f, "validation of '{}' failed: {}", service, message)
            }
        }
    }
}

/// Result of one validation dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    Status(SecretStatus),
    Failed(FailureReason),
}

impl ValidationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationOutcome::Status(_))
    }

    pub fn status(&self) -> Option<&SecretStatus> {
        match self {
            ValidationOutcome::Status(status) => Some(status),
            ValidationOutcome::Failed(_) => None,
        }
    }
}

// ============================================================================
// Collaborator traits
// ============================================================================

/// Read-only view of the supported providers and services
pub trait ChoiceRegistry {
    /// Enabled providers, in configuration order
    fn list_providers(&self) -> Vec<String>;

    /// Enabled services of one provider, in configuration order
    fn list_services(&self, provider: &str) -> Result<Vec<String>, H2vError>;

    /// Every enabled service across all providers
    fn list_all_services(&self) -> Vec<String>;
}

/// Tool version and status labels
pub trait VersionInfo {
    fn version(&self) -> &str;
    fn active_status_label(&self) -> &str;
    fn inactive_status_label(&self) -> &str;
}

/// Installs the latest release of the tool
#[async_trait]
pub trait UpdateService: Send + Sync {
    async fn perform_update(&self) -> Result<(), H2vError>;
}

/// Checks a secret against the service it belongs to
///
/// Implementations receive the normalized service token (e.g.
/// `npm_access_token`). Errors are opaque to the caller.
#[async_trait]
pub trait ValidationBackend: Send + Sync {
    async fn validate_secret(
        &self,
        service: &str,
        secret: &SecretString,
        show_response: bool,
        report_email: Option<&str>,
    ) -> anyhow::Result<SecretStatus>;
}
