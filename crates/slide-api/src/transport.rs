// Shared transport configuration for building reqwest::Client instances.
//
// The cloud and local clients share timeout and user-agent settings
// through this module.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("slidectl/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Connection establishment timeout. Local devices that are powered
    /// off never answer the TCP handshake, so this is kept short.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = self.connect_timeout.min(timeout);
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorter_timeout_caps_connect_timeout() {
        let cfg = TransportConfig::default().with_timeout(Duration::from_secs(2));
        assert_eq!(cfg.timeout, Duration::from_secs(2));
        assert_eq!(cfg.connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn default_client_builds() {
        assert!(TransportConfig::default().build_client().is_ok());
    }
}
