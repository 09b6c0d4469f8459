//! Command Dispatcher - routes a parsed request to exactly one action
//!
//! Precedence, first match wins:
//!
//! 1. `--update`
//! 2. `-secretscope`
//! 3. provider, service and secret all given and non-empty
//! 4. anything else: missing arguments guidance
//!
//! Failures are logged here and never propagate; the process still exits
//! normally afterwards.

use crate::cli::parser::ParsedRequest;
use crate::core::error::H2vError;
use crate::core::traits::{ChoiceRegistry, UpdateService, ValidationBackend, ValidationOutcome};
use crate::orchestration::scope::render_scope;
use crate::orchestration::validator::ValidationOrchestrator;
use crate::security::secret;
use tracing::{error, info};

pub const USAGE_HINT: &str = "Use '-h' or '--help' for usage information.";

/// Action selected for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Update,
    Scope,
    Validate,
    MissingArguments,
}

/// Pick the action for `request`
pub fn select_mode(request: &ParsedRequest) -> Mode {
    if request.do_update {
        return Mode::Update;
    }
    if request.show_scope {
        return Mode::Scope;
    }

    let given = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
    let has_secret = request
        .secret
        .as_ref()
        .is_some_and(|value| !secret::is_empty(value));

    if given(&request.provider) && given(&request.service) && has_secret {
        Mode::Validate
    } else {
        Mode::MissingArguments
    }
}

/// What a dispatch did
#[derive(Debug)]
pub struct DispatchReport {
    pub mode: Mode,
    /// Set in [`Mode::Validate`]
    pub outcome: Option<ValidationOutcome>,
    /// Set in [`Mode::Scope`] when the table could be rendered
    pub scope: Option<String>,
}

impl DispatchReport {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            outcome: None,
            scope: None,
        }
    }
}

pub struct Dispatcher<'a> {
    registry: &'a dyn ChoiceRegistry,
    backend: &'a dyn ValidationBackend,
    updater: &'a dyn UpdateService,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        registry: &'a dyn ChoiceRegistry,
        backend: &'a dyn ValidationBackend,
        updater: &'a dyn UpdateService,
    ) -> Self {
        Self {
            registry,
            backend,
            updater,
        }
    }

    /// Run the action selected for `request`
    pub async fn run(&self, request: &ParsedRequest) -> DispatchReport {
        let mode = select_mode(request);
        let mut report = DispatchReport::new(mode);

        match mode {
            Mode::Update => {
                info!("Initiating tool update...");
                match self.updater.perform_update().await {
                    Ok(()) => info!("Tool updated successfully."),
                    Err(e) => error!("Error during tool update: {}", e),
                }
            }
            Mode::Scope => match render_scope(self.registry) {
                Ok(table) => {
                    println!("{}", table);
                    report.scope = Some(table);
                }
                Err(e) => error!("Error fetching Scoped secret services: {}", e),
            },
            Mode::Validate => {
                if let (Some(provider), Some(service), Some(secret)) =
                    (&request.provider, &request.service, &request.secret)
                {
                    info!(
                        "Initiating validation for service: {} with a provided secret.",
                        service
                    );
                    let orchestrator = ValidationOrchestrator::new(self.registry, self.backend);
                    let outcome = orchestrator
                        .validate(
                            provider,
                            service,
                            secret,
                            request.show_response,
                            request.report_email.as_deref(),
                        )
                        .await;
                    if outcome.is_success() {
                        info!("Validation completed successfully.");
                    }
                    report.outcome = Some(outcome);
                }
            }
            Mode::MissingArguments => {
                error!("{}", H2vError::MissingRequiredArguments);
                error!("{}", USAGE_HINT);
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{FailureReason, SecretState};
    use crate::orchestration::testing::{CapturedLogs, RecordingBackend, RecordingUpdater};
    use crate::registry::ChoiceSet;
    use crate::security::secret::to_secret;

    fn registry() -> ChoiceSet {
        ChoiceSet::from_static(&[("github", &["token"])])
    }

    fn validate_request() -> ParsedRequest {
        ParsedRequest {
            provider: Some("github".to_string()),
            service: Some("token".to_string()),
            secret: Some(to_secret("abc")),
            ..ParsedRequest::default()
        }
    }

    #[test]
    fn test_select_mode_precedence() {
        let everything = ParsedRequest {
            do_update: true,
            show_scope: true,
            ..validate_request()
        };
        assert_eq!(select_mode(&everything), Mode::Update);

        let scope_and_validate = ParsedRequest {
            show_scope: true,
            ..validate_request()
        };
        assert_eq!(select_mode(&scope_and_validate), Mode::Scope);

        assert_eq!(select_mode(&validate_request()), Mode::Validate);
        assert_eq!(
            select_mode(&ParsedRequest::default()),
            Mode::MissingArguments
        );
    }

    #[test]
    fn test_select_mode_requires_non_empty_values() {
        let empty_secret = ParsedRequest {
            secret: Some(to_secret("")),
            ..validate_request()
        };
        assert_eq!(select_mode(&empty_secret), Mode::MissingArguments);

        let empty_service = ParsedRequest {
            service: Some(String::new()),
            ..validate_request()
        };
        assert_eq!(select_mode(&empty_service), Mode::MissingArguments);

        let no_provider = ParsedRequest {
            provider: None,
            ..validate_request()
        };
        assert_eq!(select_mode(&no_provider), Mode::MissingArguments);
    }

    #[tokio::test]
    async fn test_update_wins_over_scope() {
        let registry = registry();
        let backend = RecordingBackend::answering(SecretState::Active);
        let updater = RecordingUpdater::succeeding();
        let dispatcher = Dispatcher::new(&registry, &backend, &updater);

        let report = dispatcher
            .run(&ParsedRequest {
                do_update: true,
                show_scope: true,
                ..validate_request()
            })
            .await;

        assert_eq!(report.mode, Mode::Update);
        assert_eq!(updater.calls(), 1);
        assert!(report.scope.is_none());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_failure_is_contained() {
        let registry = registry();
        let backend = RecordingBackend::answering(SecretState::Active);
        let updater = RecordingUpdater::failing("network unreachable");
        let dispatcher = Dispatcher::new(&registry, &backend, &updater);

        let report = dispatcher
            .run(&ParsedRequest {
                do_update: true,
                ..ParsedRequest::default()
            })
            .await;

        assert_eq!(report.mode, Mode::Update);
        assert_eq!(updater.calls(), 1);
        assert!(report.outcome.is_none());
    }

    #[tokio::test]
    async fn test_scope_lists_services_without_validating() {
        let registry = registry();
        let backend = RecordingBackend::answering(SecretState::Active);
        let updater = RecordingUpdater::succeeding();
        let dispatcher = Dispatcher::new(&registry, &backend, &updater);

        let report = dispatcher
            .run(&ParsedRequest {
                show_scope: true,
                ..validate_request()
            })
            .await;

        assert_eq!(report.mode, Mode::Scope);
        assert!(report.scope.unwrap().contains("github"));
        assert!(backend.calls().is_empty());
        assert_eq!(updater.calls(), 0);
    }

    #[tokio::test]
    async fn test_validate_passes_outcome_through() {
        let registry = registry();
        let backend = RecordingBackend::answering(SecretState::Active);
        let updater = RecordingUpdater::succeeding();
        let dispatcher = Dispatcher::new(&registry, &backend, &updater);

        let report = dispatcher.run(&validate_request()).await;

        assert_eq!(report.mode, Mode::Validate);
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].service, "token");
        assert_eq!(calls[0].secret, "abc");

        let status = report.outcome.unwrap().status().cloned().unwrap();
        assert_eq!(status.service, "token");
        assert!(status.is_active());
    }

    #[tokio::test]
    async fn test_backend_failure_reported_as_outcome() {
        let registry = registry();
        let backend = RecordingBackend::failing("timeout");
        let updater = RecordingUpdater::succeeding();
        let dispatcher = Dispatcher::new(&registry, &backend, &updater);

        let report = dispatcher.run(&validate_request()).await;

        assert_eq!(
            report.outcome,
            Some(ValidationOutcome::Failed(FailureReason::Backend {
                service: "token".to_string(),
                message: "timeout".to_string(),
            }))
        );
    }

    #[tokio::test]
    async fn test_missing_arguments_never_calls_backend() {
        let registry = registry();
        let backend = RecordingBackend::answering(SecretState::Active);
        let updater = RecordingUpdater::succeeding();
        let dispatcher = Dispatcher::new(&registry, &backend, &updater);

        let report = dispatcher.run(&ParsedRequest::default()).await;

        assert_eq!(report.mode, Mode::MissingArguments);
        assert!(report.outcome.is_none());
        assert!(backend.calls().is_empty());
        assert_eq!(updater.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_arguments_guidance_logged_as_errors() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());
        let registry = registry();
        let backend = RecordingBackend::answering(SecretState::Active);
        let updater = RecordingUpdater::succeeding();

        Dispatcher::new(&registry, &backend, &updater)
            .run(&ParsedRequest::default())
            .await;

        let missing = logs.line_with("Missing required arguments").unwrap();
        let hint = logs.line_with(USAGE_HINT).unwrap();
        assert!(missing.contains("ERROR"));
        assert!(hint.contains("ERROR"));
    }

    #[tokio::test]
    async fn test_update_progress_logged() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());
        let registry = registry();
        let backend = RecordingBackend::answering(SecretState::Active);
        let updater = RecordingUpdater::succeeding();

        Dispatcher::new(&registry, &backend, &updater)
            .run(&ParsedRequest {
                do_update: true,
                ..ParsedRequest::default()
            })
            .await;

        assert!(logs.line_with("Initiating tool update...").is_some());
        assert!(logs.line_with("Tool updated successfully.").is_some());
    }

    #[tokio::test]
    async fn test_failed_update_not_reported_as_success() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());
        let registry = registry();
        let backend = RecordingBackend::answering(SecretState::Active);
        let updater = RecordingUpdater::failing("network unreachable");

        Dispatcher::new(&registry, &backend, &updater)
            .run(&ParsedRequest {
                do_update: true,
                ..ParsedRequest::default()
            })
            .await;

        assert!(logs.line_with("Error during tool update").is_some());
        assert!(logs.line_with("Tool updated successfully.").is_none());
    }

    #[tokio::test]
    async fn test_validation_progress_logged() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());
        let registry = registry();
        let backend = RecordingBackend::answering(SecretState::Active);
        let updater = RecordingUpdater::succeeding();

        Dispatcher::new(&registry, &backend, &updater)
            .run(&validate_request())
            .await;

        assert!(
            logs.line_with("Initiating validation for service: token with a provided secret.")
                .is_some()
        );
        assert!(logs.line_with("Validation completed successfully.").is_some());
        assert!(!logs.contents().contains("abc"));
    }
}
