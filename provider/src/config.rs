//! Provider configuration.
//!
//! Settings come from the host's provider block or from `INSTATUS_*`
//! environment variables and are validated before a client is built.

use std::fmt;
use std::time::Duration;

use instatus_core::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use instatus_core::ClientConfig;
use serde::Deserialize;

use crate::error::ProviderError;

const ENV_PREFIX: &str = "INSTATUS_";

/// Provider block settings.
///
/// Loaded from the host's provider configuration or from `INSTATUS_*`
/// environment variables (`INSTATUS_API_KEY`, `INSTATUS_BASE_URL`,
/// `INSTATUS_AUX_BASE_URL`, `INSTATUS_TIMEOUT_SECS`).
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Primary API (default: https://api.instatus.com)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Page-read endpoint; page reads and imports are unavailable without it.
    #[serde(default)]
    pub aux_base_url: Option<String>,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl ProviderConfig {
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_prefixed_env(ENV_PREFIX)
    }

    fn from_prefixed_env(prefix: &str) -> Result<Self, ProviderError> {
        envy::prefixed(prefix)
            .from_env::<Self>()
            .map_err(|e| ProviderError::Config(e.to_string()))?
            .validated()
    }

    /// Parse the provider block the host passes at configure time.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProviderError> {
        serde_json::from_value::<Self>(value)
            .map_err(|e| ProviderError::Config(e.to_string()))?
            .validated()
    }

    fn validated(self) -> Result<Self, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::Config("api_key must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ProviderError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(self)
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api_key.clone())
            .with_base_url(&self.base_url)
            .with_timeout(Duration::from_secs(self.timeout_secs));
        match self.aux_base_url.as_deref().filter(|url| !url.is_empty()) {
            Some(aux) => config.with_aux_base_url(aux),
            None => config,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("aux_base_url", &self.aux_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn provider_block_defaults() {
        let config = ProviderConfig::from_value(json!({ "api_key": "k" })).unwrap();
        assert_eq!(config.base_url, "https://api.instatus.com");
        assert_eq!(config.aux_base_url, None);
        assert_eq!(config.timeout_secs, 30);

        let client = config.client_config();
        assert_eq!(client.timeout, Duration::from_secs(30));
        assert_eq!(client.aux_base_url, None);
    }

    #[test]
    fn aux_override_reaches_client_config() {
        let config = ProviderConfig::from_value(json!({
            "api_key": "k",
            "aux_base_url": "https://internal.example.com/",
            "timeout_secs": 5
        }))
        .unwrap();
        let client = config.client_config();
        assert_eq!(client.aux_base_url.as_deref(), Some("https://internal.example.com"));
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn api_key_is_required() {
        assert!(matches!(
            ProviderConfig::from_value(json!({})),
            Err(ProviderError::Config(_))
        ));
        assert!(matches!(
            ProviderConfig::from_value(json!({ "api_key": "  " })),
            Err(ProviderError::Config(_))
        ));
    }

    #[test]
    fn loads_from_environment() {
        // Unique prefix so parallel tests cannot interfere.
        std::env::set_var("INSTATUS_CFG_TEST_API_KEY", "env-key");
        std::env::set_var("INSTATUS_CFG_TEST_AUX_BASE_URL", "http://aux.local");

        let config = ProviderConfig::from_prefixed_env("INSTATUS_CFG_TEST_").unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.aux_base_url.as_deref(), Some("http://aux.local"));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ProviderConfig::from_value(json!({ "api_key": "hunter2" })).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
