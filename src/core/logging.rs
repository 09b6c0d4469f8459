//! Logging setup
//!
//! Structured logging through the `tracing` crate. Log lines go to stderr so
//! that stdout only carries command output (scope tables, version, help).

use crate::core::config::{LogFormat, LoggingConfig};
use crate::core::error::H2vError;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber from the logging configuration.
///
/// Calling this twice is harmless: the second subscriber is dropped.
pub fn init_logging(config: &LoggingConfig) -> Result<(), H2vError> {
    let filter = build_env_filter(config)?;
    let base_subscriber = Registry::default().with(filter);

    let result = match config.format {
        LogFormat::Json => base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => base_subscriber
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::new("%Y-%m-%d %H:%M:%S".to_string()))
                    .with_ansi(config.color)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    // Already initialized (tests, embedding applications)
    if result.is_err() {
        tracing::debug!("Global tracing subscriber already set");
    }

    Ok(())
}

/// Build the filter from the configured level directive
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, H2vError> {
    let level = config.level.trim();

    if level.is_empty() || level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    EnvFilter::try_new(level)
        .map_err(|e| H2vError::ConfigError(format!("Invalid log level '{}': {}", level, e)))
}
