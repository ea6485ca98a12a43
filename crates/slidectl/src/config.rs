//! Flag-aware wrappers around `slide-config`.
//!
//! Resolves the config path from `--config`, fills unset presentation flags
//! from `[defaults]`, and applies `--timeout` before building the runtime
//! `IntegrationConfig`. Core never sees these types.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use slide_config::Config;
use slide_core::IntegrationConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// `--config` if given, otherwise the platform location.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(slide_config::config_path)
}

/// Load the config file (plus `SLIDE_*` overrides).
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(slide_config::load_config(&config_path(global))?)
}

/// Load the config, falling back to defaults on any error.
///
/// Used where a broken file must not block the command (`config show`,
/// presentation defaults).
pub fn load_or_default(global: &GlobalOpts) -> Config {
    load(global).unwrap_or_default()
}

/// Fill `--output` / `--color` from the config's `[defaults]` when unset.
pub fn apply_defaults(global: &mut GlobalOpts) {
    if global.output.is_some() && global.color.is_some() {
        return;
    }
    let cfg = load_or_default(global);
    if global.output.is_none() {
        global.output = OutputFormat::from_str(&cfg.defaults.output, true).ok();
    }
    if global.color.is_none() {
        global.color = ColorMode::from_str(&cfg.defaults.color, true).ok();
    }
}

/// Build the runtime config for a controller-bound command.
pub fn integration_config(global: &GlobalOpts) -> Result<IntegrationConfig, CliError> {
    let path = config_path(global);
    let mut cfg = slide_config::load_config(&path)?;
    if cfg.cloud.is_none() && cfg.local.is_empty() {
        return Err(CliError::NoConfig {
            path: path.display().to_string(),
        });
    }
    if let Some(secs) = global.timeout {
        cfg.timeout = secs;
    }
    Ok(slide_config::to_integration_config(&cfg)?)
}

/// Parse a humantime interval given on the command line.
pub fn parse_interval(field: &str, raw: &str) -> Result<Duration, CliError> {
    let interval = slide_config::parse_duration(field, raw)?;
    if interval.is_zero() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(interval)
}
