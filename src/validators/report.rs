//! Report mailer (alpha)
//!
//! Sends the validation result to the address given with `--report`
//! through an HTTP mail API.

use crate::core::config::ReportConfig;
use crate::core::traits::SecretStatus;
use anyhow::{Context, Result, bail};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;

const MAIL_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ReportMailer {
    client: Client,
    url: String,
    token: SecretString,
    from_address: String,
    from_name: String,
    template_key: Option<String>,
    app_name: String,
}

impl ReportMailer {
    pub fn new(config: &ReportConfig, app_name: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(MAIL_TIMEOUT)
            .build()
            .context("Failed to create mail client")?;

        Ok(Self {
            client,
            url: config.url.clone(),
            token: SecretString::new(config.token.as_str().into()),
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
            template_key: config.template_key.clone(),
            app_name: app_name.to_string(),
        })
    }

    /// Mail API request body for one result
    pub fn payload(&self, recipient: &str, status: &SecretStatus, label: &str) -> Value {
        let mut payload = json!({
            "from": { "address": self.from_address, "name": self.from_name },
            "to": [{ "email_address": { "address": recipient } }],
            "subject": format!("{} Secret Validation Report", self.app_name),
            "merge_info": {
                "service": status.service,
                "state": label,
                "message": status.message,
                "response": status.response.clone().unwrap_or_default(),
                "timestamp": status.timestamp.to_rfc3339(),
            },
        });
        if let Some(key) = &self.template_key {
            payload["template_key"] = json!(key);
        }
        payload
    }

    /// Deliver the report for `status` to `recipient`
    pub async fn send(&self, recipient: &str, status: &SecretStatus, label: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.token.expose_secret())
            .json(&self.payload(recipient, status, label))
            .send()
            .await
            .context("Mail API request failed")?;

        if !response.status().is_success() {
            bail!("Mail API answered with HTTP {}", response.status());
        }

        info!("Validation report sent to {}", recipient);
        Ok(())
    }
}
