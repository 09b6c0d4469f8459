//! Validation Orchestrator - runs one secret validation
//!
//! Checks the provider and service against the registry, normalizes the
//! service name into the backend token format and hands the secret to the
//! backend. Backend failures never escape: they come back as
//! [`ValidationOutcome::Failed`].

use crate::core::error::H2vError;
use crate::core::traits::{ChoiceRegistry, FailureReason, ValidationBackend, ValidationOutcome};
use crate::security::secret::redact;
use crate::validation::choice_validator::format_service;
use secrecy::SecretString;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

pub const STARTED_MESSAGE: &str = "Started validating secret...";

pub struct ValidationOrchestrator<'a> {
    registry: &'a dyn ChoiceRegistry,
    backend: &'a dyn ValidationBackend,
}

impl<'a> ValidationOrchestrator<'a> {
    pub fn new(registry: &'a dyn ChoiceRegistry, backend: &'a dyn ValidationBackend) -> Self {
        Self { registry, backend }
    }

    /// Validate `secret` for `service` of `provider`
    pub async fn validate(
        &self,
        provider: &str,
        service: &str,
        secret: &SecretString,
        show_response: bool,
        report_email: Option<&str>,
    ) -> ValidationOutcome {
        let span = info_span!("validate", request_id = %Uuid::new_v4(), provider, service);

        self.run(provider, service, secret, show_response, report_email)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        provider: &str,
        service: &str,
        secret: &SecretString,
        show_response: bool,
        report_email: Option<&str>,
    ) -> ValidationOutcome {
        info!("{}", STARTED_MESSAGE);

        if !self.registry.list_providers().iter().any(|p| p == provider) {
            warn!("Provider '{}' is not supported", provider);
            return ValidationOutcome::Failed(FailureReason::BadProvider {
                provider: provider.to_string(),
            });
        }

        let supported = self
            .registry
            .list_services(provider)
            .map(|services| services.iter().any(|s| s == service))
            .unwrap_or(false);
        if !supported {
            warn!("Service '{}' is not supported by '{}'", service, provider);
            return ValidationOutcome::Failed(FailureReason::BadService {
                service: service.to_string(),
            });
        }

        let token = format_service(service);
        debug!(token = %token, secret = %redact(secret), "Calling validation backend");

        match self
            .backend
            .validate_secret(&token, secret, show_response, report_email)
            .await
        {
            Ok(status) => {
                info!("{}", status.message);
                ValidationOutcome::Status(status)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!(
                    "{}",
                    H2vError::BackendError {
                        service: service.to_string(),
                        message: message.clone(),
                    }
                );
                ValidationOutcome::Failed(FailureReason::Backend {
                    service: service.to_string(),
                    message,
                })
            }
        }
    }
}
