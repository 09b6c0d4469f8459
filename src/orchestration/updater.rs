//! Self-update through `cargo install`

use crate::core::error::H2vError;
use crate::core::traits::UpdateService;
use crate::security::command_executor::{CommandError, SafeCommandExecutor};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

const UPDATE_TIMEOUT: Duration = Duration::from_secs(600);

fn update_failed(error: CommandError) -> H2vError {
    H2vError::UpdateFailed {
        message: H2vError::from(error).to_string(),
    }
}

/// Reinstalls the latest published release of the tool
#[derive(Debug, Clone)]
pub struct CargoUpdater {
    package_name: String,
    working_dir: PathBuf,
}

impl CargoUpdater {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            working_dir: std::env::temp_dir(),
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Arguments passed to `cargo`
    pub fn install_args(&self) -> Vec<&str> {
        vec!["install", self.package_name.as_str(), "--force"]
    }
}

#[async_trait]
impl UpdateService for CargoUpdater {
    async fn perform_update(&self) -> Result<(), H2vError> {
        let mut executor = SafeCommandExecutor::new(&self.working_dir).map_err(update_failed)?;
        executor.set_timeout(UPDATE_TIMEOUT);

        info!("Updating {} to the latest version", self.package_name);
        let output = executor
            .execute("cargo", &self.install_args())
            .await
            .map_err(update_failed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(H2vError::UpdateFailed {
                message: stderr.trim().to_string(),
            });
        }

        info!("{} is up to date", self.package_name);
        Ok(())
    }
}
