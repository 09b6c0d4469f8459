//! HTTP probe - checks a secret by calling an authenticated endpoint
//!
//! The probe sends one GET request with the secret in the configured
//! authorization scheme and maps the HTTP status to a [`SecretState`].

use crate::core::config::ProbeConfig;
use crate::core::traits::{SecretState, SecretStatus};
use crate::registry::token_manager::{ProbeAuth, ProbeSpec};
use anyhow::{Context, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, warn};

/// Reusable HTTP client for probes
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// GET request for `spec` carrying `secret`
    pub fn request(&self, spec: &ProbeSpec, secret: &SecretString) -> RequestBuilder {
        let request = self.client.get(&spec.url);
        let secret = secret.expose_secret();

        match &spec.auth {
            ProbeAuth::Bearer => request.bearer_auth(secret),
            ProbeAuth::Token => request.header(AUTHORIZATION, format!("token {}", secret)),
            ProbeAuth::Basic => request.basic_auth(secret, None::<&str>),
            ProbeAuth::Header { name } => request.header(name.as_str(), secret),
        }
    }

    /// Probe `spec` and build the status for `service`.
    ///
    /// # Errors
    ///
    /// Transport failures (DNS, connect, timeout) and unreadable bodies.
    pub async fn check(
        &self,
        service: &str,
        spec: &ProbeSpec,
        secret: &SecretString,
        show_response: bool,
    ) -> Result<SecretStatus> {
        let response = self
            .request(spec, secret)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", spec.url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response from {}", spec.url))?;
        debug!(status, url = %spec.url, "Probe answered");
        if !spec.active_statuses.contains(&status) && !spec.inactive_statuses.contains(&status) {
            warn!(status, url = %spec.url, "Unexpected probe status, treating secret as inactive");
        }

        let state = classify(spec, status, &body);
        Ok(SecretStatus::new(service, state, show_response, Some(pretty_body(&body)))
            .with_http_status(status))
    }
}

/// Map an HTTP answer to a secret state.
///
/// Active statuses count only when the optional JSON pointer in the body is
/// `true`. Every other status, listed as inactive or not, is inactive.
pub fn classify(spec: &ProbeSpec, status: u16, body: &str) -> SecretState {
    if !spec.active_statuses.contains(&status) {
        return SecretState::Inactive;
    }

    match &spec.active_pointer {
        None => SecretState::Active,
        Some(pointer) => {
            let flag = serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|json| json.pointer(pointer).and_then(|v| v.as_bool()));
            if flag == Some(true) {
                SecretState::Active
            } else {
                SecretState::Inactive
            }
        }
    }
}

/// Pretty-print JSON bodies, keep anything else as is
fn pretty_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|json| serde_json::to_string_pretty(&json))
        .unwrap_or_else(|_| body.to_string())
}
