//! Token manager document
//!
//! The token manager document lists, per provider, the services whose
//! secrets can be validated:
//!
//! ```json
//! {
//!   "NPM": [
//!     {
//!       "display_name": "NPM Access Token",
//!       "secret_type": "access_token",
//!       "is_enabled": true,
//!       "probe": { "url": "https://registry.npmjs.org/-/npm/v1/user", "auth": { "scheme": "bearer" } }
//!     }
//!   ]
//! }
//! ```
//!
//! Provider order in the file is kept.

use crate::core::error::H2vError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Token manager document compiled into the binary
pub const EMBEDDED_TOKEN_MANAGER: &str = include_str!("../../data/tokenManager.json");

/// One service entry of a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeSpec>,
}

/// How the HTTP probe presents a secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "lowercase")]
pub enum ProbeAuth {
    /// `Authorization: Bearer <secret>`
    Bearer,
    /// `Authorization: token <secret>`
    Token,
    /// HTTP basic auth with the secret as user name
    Basic,
    /// Secret sent verbatim in a named header
    Header { name: String },
}

/// HTTP request used to check a secret
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSpec {
    pub url: String,
    pub auth: ProbeAuth,
    #[serde(default = "default_active_statuses")]
    pub active_statuses: Vec<u16>,
    #[serde(default = "default_inactive_statuses")]
    pub inactive_statuses: Vec<u16>,
    /// JSON pointer that must be `true` in an active response body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_pointer: Option<String>,
}

fn default_active_statuses() -> Vec<u16> {
    vec![200]
}

fn default_inactive_statuses() -> Vec<u16> {
    vec![400, 401, 403]
}

/// Parsed token manager document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenManager {
    providers: Vec<(String, Vec<ServiceEntry>)>,
}

impl TokenManager {
    /// Parse a token manager document
    pub fn parse(content: &str) -> Result<Self, H2vError> {
        let document: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)
            .map_err(|e| H2vError::TokenManagerError(format!("Invalid JSON: {}", e)))?;

        let mut providers = Vec::with_capacity(document.len());
        for (provider, entries) in document {
            let entries: Vec<ServiceEntry> = serde_json::from_value(entries).map_err(|e| {
                H2vError::TokenManagerError(format!(
                    "Invalid service list for provider '{}': {}",
                    provider, e
                ))
            })?;
            providers.push((provider, entries));
        }

        Ok(Self { providers })
    }

    /// Read and parse a token manager document from disk
    pub async fn load(path: &Path) -> Result<Self, H2vError> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            H2vError::TokenManagerError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
    }

    /// The document shipped with the tool
    pub fn embedded() -> Result<Self, H2vError> {
        Self::parse(EMBEDDED_TOKEN_MANAGER)
    }

    /// All providers with all entries, enabled or not
    pub fn providers(&self) -> impl Iterator<Item = (&str, &[ServiceEntry])> {
        self.providers
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    /// Enabled entries as (provider, entry) pairs, in document order
    pub fn enabled_entries(&self) -> impl Iterator<Item = (&str, &ServiceEntry)> {
        self.providers().flat_map(|(provider, entries)| {
            entries
                .iter()
                .filter(|entry| entry.is_enabled)
                .map(move |entry| (provider, entry))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "Zeta": [
            { "display_name": "Zeta Key", "is_enabled": true }
        ],
        "Alpha": [
            { "display_name": "Alpha Token", "is_enabled": false },
            {
                "display_name": "Alpha Key",
                "is_enabled": true,
                "probe": { "url": "https://alpha.example.com/me", "auth": { "scheme": "header", "name": "X-Api-Key" } }
            }
        ]
    }"#;

    #[test]
    fn test_parse_keeps_document_order() {
        let manager = TokenManager::parse(DOCUMENT).unwrap();
        let names: Vec<&str> = manager.providers().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_enabled_entries_skip_disabled() {
        let manager = TokenManager::parse(DOCUMENT).unwrap();
        let enabled: Vec<(&str, &str)> = manager
            .enabled_entries()
            .map(|(provider, entry)| (provider, entry.display_name.as_str()))
            .collect();

        assert_eq!(enabled, vec![("Zeta", "Zeta Key"), ("Alpha", "Alpha Key")]);
    }

    #[test]
    fn test_probe_defaults() {
        let manager = TokenManager::parse(DOCUMENT).unwrap();
        let (_, entry) = manager
            .enabled_entries()
            .find(|(_, entry)| entry.probe.is_some())
            .unwrap();
        let probe = entry.probe.as_ref().unwrap();

        assert_eq!(
            probe.auth,
            ProbeAuth::Header {
                name: "X-Api-Key".to_string()
            }
        );
        assert_eq!(probe.active_statuses, vec![200]);
        assert_eq!(probe.inactive_statuses, vec![400, 401, 403]);
        assert!(probe.active_pointer.is_none());
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let result = TokenManager::parse("[1, 2, 3]");
        assert!(matches!(result, Err(H2vError::TokenManagerError(_))));
    }

    #[test]
    fn test_parse_rejects_bad_entry() {
        let result = TokenManager::parse(r#"{ "NPM": [ { "is_enabled": true } ] }"#);

        match result {
            Err(H2vError::TokenManagerError(message)) => assert!(message.contains("NPM")),
            other => panic!("expected token manager error, got {:?}", other),
        }
    }

    #[test]
    fn test_embedded_document_is_valid() {
        let manager = TokenManager::embedded().unwrap();

        assert!(manager.enabled_entries().count() >= 3);
        assert!(
            manager
                .enabled_entries()
                .all(|(_, entry)| entry.probe.is_some())
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tokenManager.json");
        std::fs::write(&path, DOCUMENT).unwrap();

        let manager = TokenManager::load(&path).await.unwrap();
        assert_eq!(manager.providers().count(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = TokenManager::load(Path::new("/nonexistent/tokenManager.json")).await;
        assert!(matches!(result, Err(H2vError::TokenManagerError(_))));
    }
}
