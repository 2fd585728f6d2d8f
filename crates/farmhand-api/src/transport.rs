// Shared transport configuration for building reqwest::Client instances.
//
// Keeps timeout and user-agent settings in one place so every client
// the crate hands out behaves the same.

use std::time::Duration;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("farmhand/0.1.0")
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
