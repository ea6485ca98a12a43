//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use slide_config::ConfigError;
use slide_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach {target}")]
    #[diagnostic(
        code(slidectl::connection_failed),
        help(
            "Check that the device is powered and on the network, or that\n\
             the cloud API is reachable. Try again with -v for details."
        )
    )]
    ConnectionFailed {
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(slidectl::timeout),
        help("Increase the limit with --timeout or `timeout` in the config file.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Cloud authentication failed: {message}")]
    #[diagnostic(
        code(slidectl::auth_failed),
        help(
            "Verify the account username and password.\n\
             Run: slidectl config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for cloud account '{username}'")]
    #[diagnostic(
        code(slidectl::no_credentials),
        help(
            "Store one with: slidectl config set-password\n\
             Or set the SLIDE_CLOUD_PASSWORD environment variable."
        )
    )]
    NoCredentials { username: String },

    // ── Covers ───────────────────────────────────────────────────────
    #[error("Cover '{identifier}' not found")]
    #[diagnostic(
        code(slidectl::not_found),
        help("Run: slidectl covers list to see available covers")
    )]
    NotFound { identifier: String },

    #[error("'{operation}' is not supported by this cover")]
    #[diagnostic(code(slidectl::unsupported), help("This command requires {required}."))]
    Unsupported { operation: String, required: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(slidectl::api_error))]
    ApiError { message: String, status: Option<u16> },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(slidectl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file not found")]
    #[diagnostic(
        code(slidectl::no_config),
        help(
            "Create one with: slidectl config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(slidectl::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(slidectl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Controller is not running")]
    #[diagnostic(code(slidectl::disconnected))]
    Disconnected,

    #[error("Internal error: {0}")]
    #[diagnostic(code(slidectl::internal))]
    Internal(String),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Disconnected => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. }
            | Self::NoConfig { .. }
            | Self::Config(_)
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::ApiError { .. } | Self::Internal(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { target, reason } => CliError::ConnectionFailed {
                target,
                source: reason.into(),
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::ControllerDisconnected => CliError::Disconnected,
            CoreError::Timeout { .. } => CliError::Timeout,
            CoreError::CoverNotFound { identifier } => CliError::NotFound { identifier },
            CoreError::Unsupported {
                operation,
                required,
            } => CliError::Unsupported {
                operation,
                required,
            },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Api { message, status } => CliError::ApiError { message, status },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { username } => CliError::NoCredentials { username },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(Box::new(other)),
        }
    }
}
