//! Configuration for the CRPT client.

use serde::{Deserialize, Serialize};

use crate::error::{CrptError, Result};
use crate::ratelimit::WindowUnit;

/// Configuration for a [`CrptClient`](crate::client::CrptClient).
///
/// `window` and `request_limit` are required and have no defaults; the
/// endpoint and HTTP timeout default to the production values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Endpoint URL for document submission
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Reset granularity of the rate limit window
    pub window: WindowUnit,

    /// Maximum number of requests per window
    pub request_limit: u32,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Create a configuration with the default endpoint and timeout.
    pub fn new(window: WindowUnit, request_limit: u32) -> Self {
        Self {
            endpoint: default_endpoint(),
            window,
            request_limit,
            request_timeout_secs: default_request_timeout(),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.request_limit == 0 {
            return Err(CrptError::Config(
                "request_limit must be positive".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(CrptError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_endpoint() -> String {
    "https://ismp.crpt.ru/api/v3/lk/documents/create".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
