//! Configuration for slidectl.
//!
//! TOML file + `SLIDE_*` environment overrides, credential resolution
//! (env + keyring + plaintext), and translation to
//! `slide_core::IntegrationConfig`. The CLI adds flag-aware wrappers on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use slide_core::{ApiVersion, CloudConfig, IntegrationConfig, LocalCoverConfig};

/// Environment variable consulted first for the cloud password.
pub const PASSWORD_ENV: &str = "SLIDE_CLOUD_PASSWORD";

const KEYRING_SERVICE: &str = "slidectl";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for cloud account '{username}'")]
    NoCredentials { username: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Poll interval, humantime syntax (`"30s"`, `"2m"`). `"0s"` disables polling.
    #[serde(default = "default_scan_interval")]
    pub scan_interval: String,

    /// Hysteresis band near both endpoints, `0 <= offset < 0.5`.
    #[serde(default = "default_offset")]
    pub offset: f64,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Delay before an unreachable local device is set up again.
    #[serde(default = "default_setup_retry")]
    pub setup_retry: String,

    /// CLI presentation defaults.
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud: Option<CloudSection>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local: Vec<LocalSection>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_interval: default_scan_interval(),
            offset: default_offset(),
            timeout: default_timeout(),
            setup_retry: default_setup_retry(),
            defaults: Defaults::default(),
            cloud: None,
            local: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

/// `[cloud]` account section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CloudSection {
    pub username: String,

    /// Plaintext password. Prefer the keyring or `SLIDE_CLOUD_PASSWORD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default)]
    pub invert_position: bool,

    /// Override the API endpoint (testing, proxies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// One `[[local]]` device entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocalSection {
    pub host: String,

    /// Device password, only used by API version 1.
    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub invert_position: bool,

    #[serde(default = "default_api_version")]
    pub api_version: u8,
}

impl LocalSection {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            password: String::new(),
            invert_position: false,
            api_version: default_api_version(),
        }
    }
}

fn default_scan_interval() -> String {
    "30s".into()
}
fn default_offset() -> f64 {
    slide_core::DEFAULT_OFFSET
}
fn default_timeout() -> u64 {
    slide_core::DEFAULT_TIMEOUT.as_secs()
}
fn default_setup_retry() -> String {
    "120s".into()
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_api_version() -> u8 {
    2
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "slide", "slidectl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("slidectl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error; defaults and `SLIDE_*` variables still
/// apply. Nested keys use a double underscore (`SLIDE_CLOUD__USERNAME`).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("SLIDE_")
                .ignore(&["cloud_password", "config", "log"])
                .split("__"),
        );

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Parse a config from a TOML string, without environment overrides.
pub fn parse_config(toml_str: &str) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::string(toml_str))
        .extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the cloud password: `SLIDE_CLOUD_PASSWORD`, then the system
/// keyring, then the plaintext `password` key.
pub fn resolve_cloud_password(cloud: &CloudSection) -> Result<SecretString, ConfigError> {
    resolve_secret(
        std::env::var(PASSWORD_ENV).ok(),
        || keyring_password(&cloud.username),
        cloud.password.as_deref(),
    )
    .ok_or_else(|| ConfigError::NoCredentials {
        username: cloud.username.clone(),
    })
}

fn resolve_secret(
    env: Option<String>,
    keyring: impl FnOnce() -> Option<String>,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    env.filter(|v| !v.is_empty())
        .or_else(keyring)
        .or_else(|| plaintext.map(str::to_owned))
        .map(SecretString::from)
}

fn keyring_entry(username: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("cloud/{username}"))
}

fn keyring_password(username: &str) -> Option<String> {
    keyring_entry(username).ok()?.get_password().ok()
}

/// Store the cloud password in the system keyring.
pub fn store_cloud_password(username: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(username)?.set_password(password)?;
    Ok(())
}

// ── Translation to runtime config ───────────────────────────────────

/// Build an `IntegrationConfig` from a loaded Config.
///
/// Durations and API versions are parsed here; errors name the offending
/// field.
pub fn to_integration_config(cfg: &Config) -> Result<IntegrationConfig, ConfigError> {
    let scan_interval = parse_duration("scan_interval", &cfg.scan_interval)?;
    let setup_retry = parse_duration("setup_retry", &cfg.setup_retry)?;

    if !(0.0..0.5).contains(&cfg.offset) {
        return Err(invalid(
            "offset",
            format!("must be >= 0 and < 0.5, got {}", cfg.offset),
        ));
    }
    if cfg.timeout == 0 {
        return Err(invalid("timeout", "must be at least 1 second"));
    }

    let cloud = cfg.cloud.as_ref().map(cloud_config).transpose()?;

    let local = cfg
        .local
        .iter()
        .enumerate()
        .map(|(i, section)| local_config(i, section))
        .collect::<Result<Vec<_>, _>>()?;

    let integration = IntegrationConfig {
        cloud,
        local,
        scan_interval,
        offset: cfg.offset,
        timeout: Duration::from_secs(cfg.timeout),
        setup_retry,
    };

    integration
        .validate()
        .map_err(|e| invalid("config", e.to_string()))?;
    Ok(integration)
}

fn cloud_config(section: &CloudSection) -> Result<CloudConfig, ConfigError> {
    if section.username.trim().is_empty() {
        return Err(invalid("cloud.username", "must not be empty"));
    }
    let raw_url = section
        .base_url
        .as_deref()
        .unwrap_or(slide_core::DEFAULT_CLOUD_URL);
    let base_url = url::Url::parse(raw_url)
        .map_err(|_| invalid("cloud.base_url", format!("invalid URL: {raw_url}")))?;

    Ok(CloudConfig {
        base_url,
        username: section.username.clone(),
        password: resolve_cloud_password(section)?,
        invert_position: section.invert_position,
    })
}

fn local_config(index: usize, section: &LocalSection) -> Result<LocalCoverConfig, ConfigError> {
    if section.host.trim().is_empty() {
        return Err(invalid(format!("local[{index}].host"), "must not be empty"));
    }
    let api_version = ApiVersion::try_from(section.api_version).map_err(|v| {
        invalid(
            format!("local[{index}].api_version"),
            format!("expected 1 or 2, got {v}"),
        )
    })?;

    Ok(LocalCoverConfig {
        host: section.host.clone(),
        password: SecretString::from(section.password.clone()),
        invert_position: section.invert_position,
        api_version,
    })
}

/// Parse a humantime duration, naming `field` in the error.
pub fn parse_duration(field: &str, raw: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(raw.trim()).map_err(|e| invalid(field, format!("'{raw}': {e}")))
}
