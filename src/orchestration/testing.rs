//! Recording fakes for the collaborator traits

use crate::core::error::H2vError;
use crate::core::traits::{SecretState, SecretStatus, UpdateService, ValidationBackend};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// One recorded `validate_secret` call
#[derive(Debug, Clone, PartialEq)]
pub struct BackendCall {
    pub service: String,
    pub secret: String,
    pub show_response: bool,
    pub report_email: Option<String>,
}

/// Backend answering with a fixed state (or error) and recording calls
pub struct RecordingBackend {
    pub calls: Mutex<Vec<BackendCall>>,
    answer: Result<SecretState, String>,
}

impl RecordingBackend {
    pub fn answering(state: SecretState) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            answer: Ok(state),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            answer: Err(message.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ValidationBackend for RecordingBackend {
    async fn validate_secret(
        &self,
        service: &str,
        secret: &SecretString,
        show_response: bool,
        report_email: Option<&str>,
    ) -> anyhow::Result<SecretStatus> {
        self.calls.lock().unwrap().push(BackendCall {
            service: service.to_string(),
            secret: secret.expose_secret().to_string(),
            show_response,
            report_email: report_email.map(str::to_string),
        });

        match &self.answer {
            Ok(state) => Ok(SecretStatus::new(
                service,
                *state,
                show_response,
                Some("{\"login\":\"octocat\"}".to_string()),
            )
            .with_report(report_email)),
            Err(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }
}

/// Update service counting its invocations
pub struct RecordingUpdater {
    pub calls: Mutex<usize>,
    fail_with: Option<String>,
}

impl RecordingUpdater {
    pub fn succeeding() -> Self {
        Self {
            calls: Mutex::new(0),
            fail_with: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(0),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl UpdateService for RecordingUpdater {
    async fn perform_update(&self) -> Result<(), H2vError> {
        *self.calls.lock().unwrap() += 1;

        match &self.fail_with {
            Some(message) => Err(H2vError::UpdateFailed {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// In-memory log sink for asserting on emitted log lines
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Plain-text subscriber writing into this sink
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        let sink = self.clone();
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || sink.clone())
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// First line containing `needle`
    pub fn line_with(&self, needle: &str) -> Option<String> {
        self.contents()
            .lines()
            .find(|line| line.contains(needle))
            .map(str::to_string)
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
