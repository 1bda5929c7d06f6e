//! Configuration for tgstat.
//!
//! One flat TOML file plus `TGSTAT_*` environment overrides, and the
//! password chain (named env var, `TGSTAT_PASSWORD`, keyring, plaintext).
//! The CLI layers its own flag overrides on top.

use std::collections::BTreeMap;
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
use tracing::debug;

use tgstat_api::Credentials;

/// Keyring service name; the account is the modem username.
pub const KEYRING_SERVICE: &str = "tgstat";

const ENV_PREFIX: &str = "TGSTAT_";

/// Keys read verbatim from the environment. Figment would parse
/// `TGSTAT_USERNAME=1001` as an integer and reject it.
const STRING_KEYS: [&str; 3] = ["address", "username", "password_env"];
const ENV_SKIPPED: [&str; 4] = ["address", "username", "password_env", "password"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for '{username}'")]
    NoCredentials { username: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Modem address, host or URL (e.g. "192.168.1.254").
    pub address: Option<String>,

    #[serde(default = "default_username")]
    pub username: String,

    /// Plaintext password (prefer the keyring or an env var).
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    pub password_env: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between `watch` polls.
    #[serde(default = "default_interval")]
    pub interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: None,
            username: default_username(),
            password: None,
            password_env: None,
            timeout: default_timeout(),
            interval: default_interval(),
        }
    }
}

fn default_username() -> String {
    "admin".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_interval() -> u64 {
    60
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Copy with the plaintext password masked, for display.
    pub fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| "********".into()),
            ..self.clone()
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "tgstat").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("tgstat");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load from defaults, the TOML file (`path` or the platform default),
/// then `TGSTAT_*` environment variables. A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    debug!(path = %path.display(), "loading config");

    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&ENV_SKIPPED))
        .merge(Serialized::defaults(string_env()))
        .extract()?;

    if config.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }
    Ok(config)
}

/// `TGSTAT_PASSWORD` is left to [`resolve_password`], which reads it raw.
fn string_env() -> BTreeMap<&'static str, String> {
    STRING_KEYS
        .into_iter()
        .filter_map(|key| {
            let var = format!("{ENV_PREFIX}{}", key.to_uppercase());
            std::env::var(var).ok().map(|value| (key, value))
        })
        .collect()
}

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the password from the credential chain.
pub fn resolve_password(cfg: &Config) -> Result<SecretString, ConfigError> {
    // 1. Config's password_env → env var lookup
    if let Some(ref env_name) = cfg.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
        debug!(var = %env_name, "password_env variable is not set");
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var("TGSTAT_PASSWORD") {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &cfg.username) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = cfg.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        username: cfg.username.clone(),
    })
}

/// Build handshake credentials; the address is required.
pub fn resolve_credentials(cfg: &Config) -> Result<Credentials, ConfigError> {
    let address = cfg
        .address
        .clone()
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| ConfigError::Validation {
            field: "address".into(),
            reason: "not set (use --address, TGSTAT_ADDRESS or the config file)".into(),
        })?;

    Ok(Credentials {
        address,
        username: cfg.username.clone(),
        password: resolve_password(cfg)?,
    })
}

/// Store a password in the system keyring under the given username.
pub fn store_password(username: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, username)?.set_password(password)?;
    Ok(())
}
