//! SafeCommandExecutor: whitelisted subprocess execution
//!
//! The self-update path is the only place the tool starts another program.
//! Commands are spawned directly (never through a shell), arguments are
//! passed as a vector, and only whitelisted programs may run.
//!
//! # Example
//!
//! ```rust,no_run
//! use how2validate::security::SafeCommandExecutor;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), how2validate::security::CommandError> {
//! let mut executor = SafeCommandExecutor::new(std::env::temp_dir())?;
//! executor.set_timeout(Duration::from_secs(600));
//!
//! let output = executor.execute("cargo", &["--version"]).await?;
//! println!("{}", String::from_utf8_lossy(&output.stdout));
//! # Ok(())
//! # }
//! ```

use crate::core::error::H2vError;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Programs the executor is allowed to start
const ALLOWED_COMMANDS: &[&str] = &["cargo"];

/// Errors that can occur during command execution
#[derive(Error, Debug)]
pub enum CommandError {
    /// Command is not in the allowed whitelist
    #[error("Command '{0}' is not in the allowed whitelist")]
    CommandNotAllowed(String),

    /// Working directory does not exist or is not accessible
    #[error("Working directory does not exist: {0}")]
    InvalidWorkingDirectory(PathBuf),

    /// Command could not be started (binary not found, permission denied)
    #[error("Command execution failed: {0}")]
    ExecutionFailed(String),

    /// Command exceeded the timeout duration
    #[error("Command timeout after {0:?}")]
    Timeout(Duration),
}

impl From<CommandError> for H2vError {
    fn from(error: CommandError) -> Self {
        H2vError::CommandError(error.to_string())
    }
}

/// Whitelisted command runner
#[derive(Debug)]
pub struct SafeCommandExecutor {
    working_dir: PathBuf,
    timeout: Option<Duration>,
}

impl SafeCommandExecutor {
    /// Create an executor running commands in `working_dir`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidWorkingDirectory` if the directory does not exist.
    pub fn new<P: AsRef<Path>>(working_dir: P) -> Result<Self, CommandError> {
        let working_dir = working_dir.as_ref().to_path_buf();

        if !working_dir.is_dir() {
            return Err(CommandError::InvalidWorkingDirectory(working_dir));
        }

        Ok(Self {
            working_dir,
            timeout: None,
        })
    }

    /// Kill commands that run longer than `timeout`
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// Whether `command` may be executed
    pub fn is_allowed(command: &str) -> bool {
        ALLOWED_COMMANDS.contains(&command)
    }

    /// Run a whitelisted command and capture its output.
    ///
    /// # Errors
    ///
    /// - `CommandError::CommandNotAllowed` - command not in whitelist
    /// - `CommandError::ExecutionFailed` - binary not found or spawn error
    /// - `CommandError::Timeout` - the configured timeout elapsed
    pub async fn execute(&self, command: &str, args: &[&str]) -> Result<Output, CommandError> {
        if !Self::is_allowed(command) {
            return Err(CommandError::CommandNotAllowed(command.to_string()));
        }

        let mut cmd = Command::new(command);
        cmd.args(args)
            .current_dir(&self.working_dir)
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| CommandError::Timeout(limit))?,
            None => cmd.output().await,
        };

        output.map_err(|e| CommandError::ExecutionFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir() -> PathBuf {
        std::env::temp_dir()
    }

    #[test]
    fn test_whitelist() {
        assert!(SafeCommandExecutor::is_allowed("cargo"));
        assert!(!SafeCommandExecutor::is_allowed("rm"));
        assert!(!SafeCommandExecutor::is_allowed("sh"));
    }

    #[tokio::test]
    async fn test_rejected_command_rm() {
        let executor = SafeCommandExecutor::new(test_dir()).unwrap();
        let result = executor.execute("rm", &["-rf", "/"]).await;

        assert!(
            matches!(result, Err(CommandError::CommandNotAllowed(_))),
            "rm should be rejected as not in whitelist"
        );
    }

    #[tokio::test]
    async fn test_rejected_shell() {
        let executor = SafeCommandExecutor::new(test_dir()).unwrap();
        let result = executor.execute("sh", &["-c", "echo pwned"]).await;

        assert!(matches!(result, Err(CommandError::CommandNotAllowed(_))));
    }

    #[test]
    fn test_invalid_working_directory() {
        let result = SafeCommandExecutor::new("/nonexistent/directory/that/does/not/exist");
        assert!(
            matches!(result, Err(CommandError::InvalidWorkingDirectory(_))),
            "Should reject non-existent working directory"
        );
    }

    #[test]
    fn test_converts_into_tool_error() {
        let error: H2vError = CommandError::CommandNotAllowed("rm".to_string()).into();
        assert_eq!(error.code(), "COMMAND_ERROR");
        assert!(error.to_string().contains("'rm' is not in the allowed whitelist"));
    }

    #[test]
    fn test_error_display() {
        let error = CommandError::Timeout(Duration::from_secs(5));
        assert_eq!(error.to_string(), "Command timeout after 5s");
    }
}
