// ── Runtime integration configuration ──
//
// These types describe *which* covers to manage and how to reach them.
// They carry credential data and polling tuning, but never touch disk.
// The CLI constructs an `IntegrationConfig` and hands it in.

use std::collections::HashSet;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use slide_api::ApiVersion;
use url::Url;

use crate::error::CoreError;

/// Hysteresis band near both endpoints.
pub const DEFAULT_OFFSET: f64 = 0.15;
/// Interval between poll cycles.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(30);
/// Minimum delay before a failed local setup is attempted again.
pub const DEFAULT_SETUP_RETRY: Duration = Duration::from_secs(120);
/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Vendor cloud account.
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// API base URL (defaults to the production endpoint).
    pub base_url: Url,
    pub username: String,
    pub password: SecretString,
    pub invert_position: bool,
}

/// One device on the local network.
#[derive(Debug, Clone)]
pub struct LocalCoverConfig {
    pub host: String,
    /// Only used by API v1 devices.
    pub password: SecretString,
    pub invert_position: bool,
    pub api_version: ApiVersion,
}

impl LocalCoverConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            password: SecretString::from(String::new()),
            invert_position: false,
            api_version: ApiVersion::default(),
        }
    }
}

/// Everything the [`Controller`](crate::Controller) needs to run.
///
/// Built by the CLI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct IntegrationConfig {
    pub cloud: Option<CloudConfig>,
    pub local: Vec<LocalCoverConfig>,
    /// Poll interval. Zero disables background polling.
    pub scan_interval: Duration,
    pub offset: f64,
    pub timeout: Duration,
    pub setup_retry: Duration,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            cloud: None,
            local: Vec::new(),
            scan_interval: DEFAULT_SCAN_INTERVAL,
            offset: DEFAULT_OFFSET,
            timeout: DEFAULT_TIMEOUT,
            setup_retry: DEFAULT_SETUP_RETRY,
        }
    }
}

impl IntegrationConfig {
    /// Reject configurations the controller cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.cloud.is_none() && self.local.is_empty() {
            return Err(invalid("no cloud account or local covers configured"));
        }
        if !(0.0..0.5).contains(&self.offset) {
            return Err(invalid(format!(
                "offset must be in [0, 0.5), got {}",
                self.offset
            )));
        }
        if self.timeout.is_zero() {
            return Err(invalid("timeout must be greater than zero"));
        }
        if let Some(cloud) = &self.cloud {
            if cloud.username.trim().is_empty() {
                return Err(invalid("cloud.username must not be empty"));
            }
            if cloud.password.expose_secret().is_empty() {
                return Err(invalid("cloud.password must not be empty"));
            }
        }

        let mut seen = HashSet::new();
        for local in &self.local {
            if local.host.trim().is_empty() {
                return Err(invalid("local.host must not be empty"));
            }
            if !seen.insert(local.host.as_str()) {
                return Err(invalid(format!("duplicate local host '{}'", local.host)));
            }
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::Config {
        message: message.into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cloud() -> CloudConfig {
        CloudConfig {
            base_url: Url::parse(slide_api::DEFAULT_CLOUD_URL).unwrap(),
            username: "me@example.com".into(),
            password: SecretString::from("hunter2".to_string()),
            invert_position: false,
        }
    }

    #[test]
    fn empty_config_is_rejected() {
        assert!(matches!(
            IntegrationConfig::default().validate(),
            Err(CoreError::Config { .. })
        ));
    }

    #[test]
    fn cloud_only_is_valid() {
        let config = IntegrationConfig {
            cloud: Some(cloud()),
            ..IntegrationConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn offset_range_is_checked() {
        let mut config = IntegrationConfig {
            local: vec![LocalCoverConfig::new("192.168.1.40")],
            ..IntegrationConfig::default()
        };
        config.offset = 0.5;
        assert!(config.validate().is_err());
        config.offset = -0.1;
        assert!(config.validate().is_err());
        config.offset = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn duplicate_hosts_are_rejected() {
        let config = IntegrationConfig {
            local: vec![
                LocalCoverConfig::new("192.168.1.40"),
                LocalCoverConfig::new("192.168.1.40"),
            ],
            ..IntegrationConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn empty_cloud_password_is_rejected() {
        let mut account = cloud();
        account.password = SecretString::from(String::new());
        let config = IntegrationConfig {
            cloud: Some(account),
            ..IntegrationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
