//! Client configuration loaded from the environment.

use std::time::Duration;

use crate::api::CheckListApi;
use crate::client::HttpClient;
use crate::transport::UreqTransport;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for every endpoint path (default: `http://localhost:3000`).
    pub base_url: String,
    /// Whole-exchange timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `CHECKLIST_API_BASE_URL`     | `http://localhost:3000` |
    /// | `CHECKLIST_API_TIMEOUT_SECS` | unset (no timeout)      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("CHECKLIST_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let timeout = match lookup("CHECKLIST_API_TIMEOUT_SECS") {
            None => None,
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
                    var: "CHECKLIST_API_TIMEOUT_SECS",
                    value: value.clone(),
                })?;
                Some(Duration::from_secs(secs))
            }
        };

        Ok(Self { base_url, timeout })
    }

    /// HTTP-backed checklist API for this configuration.
    pub fn build_api(&self) -> CheckListApi<UreqTransport> {
        let transport = UreqTransport::new(self.timeout);
        CheckListApi::new(HttpClient::new(&self.base_url, transport))
    }
}
