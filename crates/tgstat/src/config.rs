//! CLI configuration: thin wrapper around `tgstat_config`.
//!
//! Adds the `GlobalOpts` flag overrides (--address, --username, --timeout)
//! on top of file + environment, and builds the modem client from the result.

use std::path::PathBuf;

use tgstat_api::{Credentials, ModemClient, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use tgstat_config::{Config, config_path, save_config, store_password};

// ── CLI-specific helpers ────────────────────────────────────────────

/// The file `--config` points at, or the platform default.
pub fn effective_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load file + env, then apply flag overrides (flag > env > file).
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = tgstat_config::load_config(global.config.as_deref())?;

    if let Some(ref address) = global.address {
        cfg.address = Some(address.clone());
    }
    if let Some(ref username) = global.username {
        cfg.username.clone_from(username);
    }
    if let Some(timeout) = global.timeout {
        if timeout == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        cfg.timeout = timeout;
    }
    Ok(cfg)
}

/// Resolve credentials and build a client honouring the configured timeout.
pub fn connect(global: &GlobalOpts) -> Result<(Config, ModemClient, Credentials), CliError> {
    let cfg = load(global)?;
    let credentials = tgstat_config::resolve_credentials(&cfg)?;
    let client = ModemClient::new(TransportConfig::with_timeout(cfg.timeout()));
    Ok((cfg, client, credentials))
}
