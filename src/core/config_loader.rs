//! Configuration file loader for how2validate
//!
//! This module provides configuration loading, validation, and environment
//! overrides.

use super::config::*;
use crate::core::error::H2vError;
use regex::Regex;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Configuration file names probed in the working directory, in order
const CONFIG_FILENAMES: &[&str] = &[".how2validate.yaml", ".how2validate.yml", ".how2validate.toml"];

/// Explicit configuration file path
pub const ENV_CONFIG_PATH: &str = "HOW2VALIDATE_CONFIG";
/// Overrides the reported version
pub const ENV_VERSION: &str = "HOW2VALIDATE_VERSION";
/// Overrides the token manager document path
pub const ENV_TOKEN_MANAGER: &str = "HOW2VALIDATE_TOKEN_MANAGER";
/// Overrides the log filter
pub const ENV_LOG: &str = "HOW2VALIDATE_LOG";

/// Environment variable pattern (${VAR_NAME})
const ENV_VAR_PATTERN: &str = r"\$\{([A-Z_][A-Z0-9_]*)\}";

/// Configuration load options
#[derive(Debug, Clone)]
pub struct ConfigLoadOptions {
    /// Directory searched for a configuration file
    pub working_dir: PathBuf,

    /// Environment variables
    pub env: HashMap<String, String>,
}

impl ConfigLoadOptions {
    /// Options for the current process: working directory and environment
    pub fn from_process() -> Self {
        Self {
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env: utf8_env(std::env::vars_os()),
        }
    }
}

/// Keep the variables whose name and value are both valid UTF-8
fn utf8_env<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Configuration validation result
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationResult {
    /// Is configuration valid?
    pub valid: bool,

    /// Validation errors
    pub errors: Vec<ConfigValidationError>,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Field path (e.g., "secret.active")
    pub field: String,

    /// Error message
    pub message: String,
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from multiple sources with priority
    ///
    /// Priority (high to low):
    /// 1. Environment variables
    /// 2. Config file (HOW2VALIDATE_CONFIG, or ./.how2validate.{yaml,yml,toml})
    /// 3. Default values
    pub async fn load(options: ConfigLoadOptions) -> Result<ToolConfig, H2vError> {
        let config = match Self::locate_config_file(&options) {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::load_config_file(&path).await?
            }
            None => ToolConfig::default(),
        };

        let config = Self::apply_env_overrides(config, &options.env);
        let config = Self::expand_env_vars(config, &options.env);

        let validation = Self::validate(&config);
        if !validation.valid {
            let details = validation
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(H2vError::ConfigError(details));
        }

        Ok(config)
    }

    /// Find the configuration file to load, if any
    fn locate_config_file(options: &ConfigLoadOptions) -> Option<PathBuf> {
        if let Some(explicit) = options.env.get(ENV_CONFIG_PATH) {
            return Some(PathBuf::from(explicit));
        }

        CONFIG_FILENAMES
            .iter()
            .map(|name| options.working_dir.join(name))
            .find(|path| path.exists())
    }

    /// Load configuration from a YAML or TOML file
    async fn load_config_file(file_path: &Path) -> Result<ToolConfig, H2vError> {
        let content = fs::read_to_string(file_path).await.map_err(|e| {
            H2vError::ConfigError(format!(
                "Failed to read config file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        let is_toml = file_path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        if is_toml {
            toml::from_str(&content).map_err(|e| {
                H2vError::ConfigError(format!("Failed to parse TOML config: {}", e))
            })
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                H2vError::ConfigError(format!("Failed to parse YAML config: {}", e))
            })
        }
    }

    /// Apply HOW2VALIDATE_* overrides
    fn apply_env_overrides(mut config: ToolConfig, env: &HashMap<String, String>) -> ToolConfig {
        if let Some(version) = env.get(ENV_VERSION) {
            config.version = version.clone();
        }

        if let Some(path) = env.get(ENV_TOKEN_MANAGER).filter(|p| !p.trim().is_empty()) {
            config.token_manager = Some(PathBuf::from(path));
        }

        if let Some(level) = env.get(ENV_LOG).filter(|l| !l.trim().is_empty()) {
            config.logging.level = level.clone();
        }

        config
    }

    /// Expand ${VAR} references in the report settings
    fn expand_env_vars(mut config: ToolConfig, env: &HashMap<String, String>) -> ToolConfig {
        if let Some(report) = &mut config.report {
            report.url = Self::expand_string(&report.url, env);
            report.token = Self::expand_string(&report.token, env);
            report.from_address = Self::expand_string(&report.from_address, env);
        }

        config
    }

    /// Expand environment variables in a single string
    ///
    /// Unknown variables are left in place.
    fn expand_string(input: &str, env: &HashMap<String, String>) -> String {
        let Ok(env_var_regex) = Regex::new(ENV_VAR_PATTERN) else {
            return input.to_string();
        };

        let mut result = input.to_string();
        for cap in env_var_regex.captures_iter(input) {
            let var_name = &cap[1];

            if let Some(value) = env.get(var_name) {
                result = result.replace(&format!("${{{}}}", var_name), value);
            } else {
                warn!("Environment variable {} not found", var_name);
            }
        }

        result
    }

    /// Validate configuration
    pub fn validate(config: &ToolConfig) -> ConfigValidationResult {
        let mut errors = Vec::new();

        // 1. Version must be semver
        if let Err(e) = semver::Version::parse(&config.version) {
            errors.push(ConfigValidationError {
                field: "version".to_string(),
                message: format!("'{}' is not a semantic version ({})", config.version, e),
            });
        }

        // 2. Package name is needed for updates
        if config.package_name.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "packageName".to_string(),
                message: "packageName is required".to_string(),
            });
        }

        // 3. Status labels
        if config.secret.active.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "secret.active".to_string(),
                message: "label must not be empty".to_string(),
            });
        }
        if config.secret.inactive.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "secret.inactive".to_string(),
                message: "label must not be empty".to_string(),
            });
        }
        if config.secret.active == config.secret.inactive {
            errors.push(ConfigValidationError {
                field: "secret".to_string(),
                message: "active and inactive labels must differ".to_string(),
            });
        }

        // 4. Probe timeout
        if config.probe.timeout_secs == 0 {
            errors.push(ConfigValidationError {
                field: "probe.timeoutSecs".to_string(),
                message: "timeout must be greater than zero".to_string(),
            });
        }

        ConfigValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }
}
