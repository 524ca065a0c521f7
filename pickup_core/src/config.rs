//! Runtime configuration for the pipeline and its adapters.
//!
//! Everything has a default. Non-secret settings may be overridden from
//! `~/.config/pickup/config.yaml`; API keys come from the credential store
//! with environment variables as fallback.

use crate::auth_store::AuthStore;
use crate::error::PickupError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Default Values
// ============================================================================

/// Largest page any adapter will request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default per-adapter fetch timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 15000;

pub const DEFAULT_LANGUAGE: &str = "en";

pub const NEWSAPI_BASE_URL: &str = "https://newsapi.org";
pub const EVENT_REGISTRY_BASE_URL: &str = "https://eventregistry.org";

/// Credential store key and environment variable for the keyword-search provider.
pub const NEWSAPI_PROVIDER: &str = "newsapi";
pub const NEWSAPI_KEY_ENV: &str = "NEWSAPI_KEY";

/// Credential store key and environment variable for the event-index provider.
pub const NEWSAPI_AI_PROVIDER: &str = "newsapi-ai";
pub const NEWSAPI_AI_KEY_ENV: &str = "NEWSAPI_AI_KEY";

/// Directory holding `config.yaml` and `auth.json`.
pub fn config_dir() -> PathBuf {
    let base = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("pickup")
}

// ============================================================================
// ProviderConfig
// ============================================================================

/// Endpoint and credential for one provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,

    /// Never written back to the YAML file
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().map(|k| !k.trim().is_empty()).unwrap_or(false)
    }
}

fn default_newsapi() -> ProviderConfig {
    ProviderConfig::new(NEWSAPI_BASE_URL)
}

fn default_event_registry() -> ProviderConfig {
    ProviderConfig::new(EVENT_REGISTRY_BASE_URL)
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

// ============================================================================
// PickupConfig
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupConfig {
    /// Keyword search provider (NewsAPI.org)
    #[serde(default = "default_newsapi")]
    pub newsapi: ProviderConfig,

    /// Event index provider (newsapi.ai / Event Registry)
    #[serde(default = "default_event_registry")]
    pub event_registry: ProviderConfig,

    /// Results requested per adapter, capped at [`MAX_PAGE_SIZE`]
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Language filter for the keyword search provider
    #[serde(default = "default_language")]
    pub language: String,

    /// Per-adapter fetch timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            newsapi: default_newsapi(),
            event_registry: default_event_registry(),
            page_size: MAX_PAGE_SIZE,
            language: default_language(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl PickupConfig {
    /// Defaults, then `config.yaml`, then stored credentials and environment.
    pub fn load(store: &dyn AuthStore) -> Result<Self, PickupError> {
        let config = Self::from_yaml_file(&config_dir().join("config.yaml"))?;
        Ok(config.with_credentials(store))
    }

    /// Reads overrides from a YAML file; a missing file yields defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, PickupError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_yaml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(PickupError::Io(e)),
        }
    }

    pub fn with_credentials(self, store: &dyn AuthStore) -> Self {
        self.with_credentials_from(store, |var| std::env::var(var).ok())
    }

    /// Resolves each provider key from the store first, then from `env`.
    pub fn with_credentials_from<F>(mut self, store: &dyn AuthStore, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |provider: &str, var: &str| {
            store
                .load(provider)
                .and_then(|auth| auth.get("api_key").cloned())
                .filter(|k| !k.trim().is_empty())
                .or_else(|| env(var).filter(|k| !k.trim().is_empty()))
        };

        if let Some(key) = resolve(NEWSAPI_PROVIDER, NEWSAPI_KEY_ENV) {
            self.newsapi.api_key = Some(key);
        }
        if let Some(key) = resolve(NEWSAPI_AI_PROVIDER, NEWSAPI_AI_KEY_ENV) {
            self.event_registry.api_key = Some(key);
        }
        self
    }

    pub fn effective_page_size(&self) -> u32 {
        self.page_size.min(MAX_PAGE_SIZE)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Checks:
    /// - `page_size` must be greater than 0
    /// - `timeout_ms` must be greater than 0
    /// - both base URLs must be absolute http(s) URLs
    pub fn validate(&self) -> Result<(), PickupError> {
        if self.page_size == 0 {
            return Err(PickupError::InvalidConfig(
                "page_size must be greater than 0".into(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(PickupError::InvalidConfig(
                "timeout_ms must be greater than 0".into(),
            ));
        }
        for (name, provider) in [("newsapi", &self.newsapi), ("event_registry", &self.event_registry)] {
            check_base_url(name, &provider.base_url)?;
        }
        Ok(())
    }
}

fn check_base_url(name: &str, base_url: &str) -> Result<(), PickupError> {
    match url::Url::parse(base_url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(PickupError::InvalidConfig(format!(
            "{}.base_url must use http or https, got {}",
            name,
            parsed.scheme()
        ))),
        Err(e) => Err(PickupError::InvalidConfig(format!(
            "{}.base_url {:?} is not a valid URL: {}",
            name, base_url, e
        ))),
    }
}
