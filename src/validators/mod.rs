//! Validation backend shipped with the tool
//!
//! [`ServiceHandlers`] maps each normalized service token (for example
//! `npm_access_token`) to the HTTP probe declared for it in the token
//! manager document.

pub mod http_probe;
pub mod report;

use crate::core::config::ToolConfig;
use crate::core::traits::{SecretState, SecretStatus, ValidationBackend};
use crate::registry::token_manager::{ProbeSpec, TokenManager};
use crate::validation::choice_validator::format_service;
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use secrecy::SecretString;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

pub use http_probe::HttpProbe;
pub use report::ReportMailer;

/// Service token to probe registry
pub struct ServiceHandlers {
    handlers: BTreeMap<String, ProbeSpec>,
    /// Tokens declared by more than one provider
    ambiguous: BTreeSet<String>,
    probe: HttpProbe,
    mailer: Option<ReportMailer>,
    active_label: String,
    inactive_label: String,
}

impl ServiceHandlers {
    /// Register a handler for every enabled entry that declares a probe
    pub fn new(manager: &TokenManager, config: &ToolConfig) -> Result<Self> {
        let mut handlers = BTreeMap::new();
        let mut ambiguous = BTreeSet::new();
        for (provider, entry) in manager.enabled_entries() {
            let Some(spec) = &entry.probe else {
                debug!(
                    "No probe declared for '{}' of {}",
                    entry.display_name, provider
                );
                continue;
            };

            let token = format_service(&entry.display_name);
            if ambiguous.contains(&token) || handlers.contains_key(&token) {
                warn!(
                    "Service '{}' of {} collides with another entry; it cannot be validated",
                    entry.display_name, provider
                );
                handlers.remove(&token);
                ambiguous.insert(token);
                continue;
            }
            handlers.insert(token, spec.clone());
        }

        let mailer = config
            .report
            .as_ref()
            .map(|report| ReportMailer::new(report, &config.app_name))
            .transpose()?;

        Ok(Self {
            handlers,
            ambiguous,
            probe: HttpProbe::new(&config.probe)?,
            mailer,
            active_label: config.secret.active.clone(),
            inactive_label: config.secret.inactive.clone(),
        })
    }

    /// Registered service tokens, sorted
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn handler(&self, service: &str) -> Option<&ProbeSpec> {
        self.handlers.get(service)
    }

    fn label(&self, state: SecretState) -> &str {
        match state {
            SecretState::Active => &self.active_label,
            SecretState::Inactive => &self.inactive_label,
        }
    }

    async fn deliver_report(&self, recipient: &str, status: &SecretStatus) {
        match &self.mailer {
            Some(mailer) => {
                if let Err(e) = mailer.send(recipient, status, self.label(status.state)).await {
                    warn!("Failed to send validation report: {:#}", e);
                }
            }
            None => info!("Report delivery is not configured; no email sent"),
        }
    }
}

#[async_trait]
impl ValidationBackend for ServiceHandlers {
    async fn validate_secret(
        &self,
        service: &str,
        secret: &SecretString,
        show_response: bool,
        report_email: Option<&str>,
    ) -> Result<SecretStatus> {
        if self.ambiguous.contains(service) {
            bail!(
                "Service '{}' is declared by several providers and cannot be validated",
                service
            );
        }
        let spec = self
            .handler(service)
            .ok_or_else(|| anyhow!("No handler for service '{}'", service))?;

        let status = self
            .probe
            .check(service, spec, secret, show_response)
            .await?
            .with_report(report_email);
        info!("Secret status: {}", self.label(status.state));

        if let Some(recipient) = report_email {
            self.deliver_report(recipient, &status).await;
        }

        Ok(status)
    }
}
