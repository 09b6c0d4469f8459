//! Configuration structures and types for how2validate
//!
//! This module provides type-safe configuration management with serde support.
//! Every section is optional in configuration files; missing values fall back
//! to the defaults below.

use crate::core::traits::VersionInfo;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolConfig {
    /// Crate name used by the self-update command
    #[serde(rename = "packageName")]
    pub package_name: String,

    /// Tool version reported by --version
    pub version: String,

    /// Application name shown in reports
    #[serde(rename = "appName")]
    pub app_name: String,

    /// Status labels
    pub secret: SecretLabels,

    /// Token manager document (None means the built-in document)
    #[serde(rename = "tokenManager", skip_serializing_if = "Option::is_none")]
    pub token_manager: Option<PathBuf>,

    /// Logging settings
    pub logging: LoggingConfig,

    /// HTTP probe settings
    pub probe: ProbeConfig,

    /// Report delivery settings (optional, alpha)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportConfig>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            package_name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            app_name: "How2Validate".to_string(),
            secret: SecretLabels::default(),
            token_manager: None,
            logging: LoggingConfig::default(),
            probe: ProbeConfig::default(),
            report: None,
        }
    }
}

impl VersionInfo for ToolConfig {
    fn version(&self) -> &str {
        &self.version
    }

    fn active_status_label(&self) -> &str {
        &self.secret.active
    }

    fn inactive_status_label(&self) -> &str {
        &self.secret.inactive
    }
}

/// Labels printed for active and inactive secrets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecretLabels {
    pub active: String,
    pub inactive: String,
}

impl Default for SecretLabels {
    fn default() -> Self {
        Self {
            active: "Active".to_string(),
            inactive: "InActive".to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive: trace, debug, info, warn, error, off
    pub level: String,

    /// Output format
    pub format: LogFormat,

    /// Colored output (text format only)
    pub color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            color: true,
        }
    }
}

/// HTTP probe configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// Request timeout in seconds
    #[serde(rename = "timeoutSecs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with probe requests
    #[serde(rename = "userAgent")]
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("how2validate/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Mail API settings for validation reports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    /// Mail API endpoint
    pub url: String,

    /// API token; usually `${HOW2VALIDATE_MAIL_TOKEN}`
    pub token: String,

    /// Sender address
    #[serde(rename = "fromAddress")]
    pub from_address: String,

    /// Sender display name
    #[serde(rename = "fromName", default = "default_from_name")]
    pub from_name: String,

    /// Mail template key (optional)
    #[serde(rename = "templateKey", skip_serializing_if = "Option::is_none")]
    pub template_key: Option<String>,
}

fn default_from_name() -> String {
    "How2Validate".to_string()
}
