//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use tgstat_config::ConfigError;
use tgstat_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const FETCH: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to modem at {url}")]
    #[diagnostic(
        code(tgstat::connection_failed),
        help(
            "Check that the modem is reachable from this machine.\n\
             Try: tgstat stats --address 192.168.1.254"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(tgstat::timeout),
        help("Increase the timeout with --timeout or check the modem's responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(tgstat::auth_failed),
        help(
            "Verify the username and password for the modem's web interface.\n\
             Run: tgstat config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for '{username}'")]
    #[diagnostic(
        code(tgstat::no_credentials),
        help(
            "Store one with: tgstat config set-password\n\
             Or set the TGSTAT_PASSWORD environment variable."
        )
    )]
    NoCredentials { username: String },

    // ── Pages ────────────────────────────────────────────────────────
    #[error("Could not fetch the {page} (HTTP {status})")]
    #[diagnostic(
        code(tgstat::fetch_failed),
        help("The session may have expired or the firmware may not serve this page.")
    )]
    FetchFailed { page: String, status: u16 },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tgstat::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists at {}", path.display())]
    #[diagnostic(
        code(tgstat::config_exists),
        help("Pass --force to overwrite it.")
    )]
    ConfigExists { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(code(tgstat::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error("Cannot read {}", path.display())]
    #[diagnostic(code(tgstat::read_failed))]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::FetchFailed { .. } => exit_code::FETCH,
            Self::Validation { .. } | Self::ConfigExists { .. } => exit_code::USAGE,
            Self::Config(inner) => match **inner {
                ConfigError::Validation { .. } => exit_code::USAGE,
                ConfigError::NoCredentials { .. } => exit_code::AUTH,
                _ => exit_code::GENERAL,
            },
            Self::ReadFile { .. } | Self::Io(_) | Self::Csv(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout { .. } => CliError::Timeout,
            CoreError::InvalidAddress { message } => CliError::Validation {
                field: "address".into(),
                reason: message,
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::PageUnavailable { page, status } => CliError::FetchFailed {
                page: page.to_string(),
                status,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { username } => CliError::NoCredentials { username },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}
