//! Choice set - the providers and services accepted on the command line
//!
//! A [`ChoiceSet`] is a read-only snapshot taken once per invocation. It is
//! built either from a fixed list (tests, embedding applications) or from a
//! token manager document.

use crate::core::config::ToolConfig;
use crate::core::error::H2vError;
use crate::core::traits::ChoiceRegistry;
use crate::registry::token_manager::TokenManager;
use std::path::PathBuf;

/// Ordered providers and, per provider, ordered services
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceSet {
    providers: Vec<(String, Vec<String>)>,
}

impl ChoiceSet {
    /// Build from (provider, services) pairs
    ///
    /// # Examples
    ///
    /// ```
    /// use how2validate::core::ChoiceRegistry;
    /// use how2validate::registry::ChoiceSet;
    ///
    /// let choices = ChoiceSet::from_static(&[("github", &["token"])]);
    /// assert_eq!(choices.list_providers(), vec!["github".to_string()]);
    /// ```
    pub fn from_static(entries: &[(&str, &[&str])]) -> Self {
        let mut set = Self::default();
        for (provider, services) in entries {
            for service in services.iter() {
                set.insert(provider, service);
            }
        }
        set
    }

    /// Build from the enabled entries of a token manager document
    pub fn from_token_manager(manager: &TokenManager) -> Self {
        let mut set = Self::default();
        for (provider, entry) in manager.enabled_entries() {
            set.insert(provider, &entry.display_name);
        }
        set
    }

    fn insert(&mut self, provider: &str, service: &str) {
        let index = match self.providers.iter().position(|(name, _)| name == provider) {
            Some(index) => index,
            None => {
                self.providers.push((provider.to_string(), Vec::new()));
                self.providers.len() - 1
            }
        };

        let services = &mut self.providers[index].1;
        if !services.iter().any(|s| s == service) {
            services.push(service.to_string());
        }
    }

    /// (provider, service) rows in order, as used by the scope table
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.providers.iter().flat_map(|(provider, services)| {
            services
                .iter()
                .map(move |service| (provider.as_str(), service.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ChoiceRegistry for ChoiceSet {
    fn list_providers(&self) -> Vec<String> {
        self.providers.iter().map(|(name, _)| name.clone()).collect()
    }

    fn list_services(&self, provider: &str) -> Result<Vec<String>, H2vError> {
        self.providers
            .iter()
            .find(|(name, _)| name == provider)
            .map(|(_, services)| services.clone())
            .ok_or_else(|| H2vError::UnknownProvider {
                provider: provider.to_string(),
            })
    }

    fn list_all_services(&self) -> Vec<String> {
        let mut all: Vec<String> = Vec::new();
        for (_, service) in self.rows() {
            if !all.iter().any(|s| s == service) {
                all.push(service.to_string());
            }
        }
        all
    }
}

/// Where the choice set comes from
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrySource {
    /// Fixed in-memory list
    Static(ChoiceSet),
    /// Token manager document on disk
    TokenManager(PathBuf),
    /// Token manager document compiled into the binary
    Embedded,
}

impl RegistrySource {
    /// Pick the source named by the configuration
    pub fn from_config(config: &ToolConfig) -> Self {
        match &config.token_manager {
            Some(path) => RegistrySource::TokenManager(path.clone()),
            None => RegistrySource::Embedded,
        }
    }

    /// Load the token manager document behind this source.
    ///
    /// A static source has no document and yields an empty one.
    pub async fn load_document(&self) -> Result<TokenManager, H2vError> {
        match self {
            RegistrySource::Static(_) => Ok(TokenManager::default()),
            RegistrySource::TokenManager(path) => TokenManager::load(path).await,
            RegistrySource::Embedded => TokenManager::embedded(),
        }
    }

    /// Load the choice set snapshot
    pub async fn load(&self) -> Result<ChoiceSet, H2vError> {
        match self {
            RegistrySource::Static(set) => Ok(set.clone()),
            _ => Ok(ChoiceSet::from_token_manager(&self.load_document().await?)),
        }
    }
}
