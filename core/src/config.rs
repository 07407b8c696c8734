//! Client configuration.
//!
//! Passed by value into `InstatusClient::new`; nothing is read from the
//! process environment here so several clients can point at different
//! servers inside one test binary.

use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.instatus.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only settings shared by every request a client issues.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    /// Base URL of the primary (bearer-token) endpoint family.
    pub base_url: String,
    /// Base URL of the auxiliary page-read endpoint family. `None` disables
    /// page reads.
    pub aux_base_url: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            aux_base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = trim_base(base_url);
        self
    }

    pub fn with_aux_base_url(mut self, aux_base_url: &str) -> Self {
        self.aux_base_url = Some(trim_base(aux_base_url));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// The key never reaches logs through `{:?}`.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("aux_base_url", &self.aux_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
