//! Config subcommand handlers.

use dialoguer::{Input, Select};

use tgstat_config::ConfigError;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_password() -> Result<String, CliError> {
    let pass = rpassword::prompt_password("Modem password: ").map_err(prompt_err)?;
    if pass.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(pass)
}

/// Offer the keyring or the config file for the password.
///
/// Returns `Some(password)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_password_storage(username: &str, password: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_password(username, &password)?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password))
    }
}

fn render_config(cfg: &Config, format: OutputFormat) -> Result<String, CliError> {
    let shown = cfg.redacted();
    Ok(match format {
        OutputFormat::Json => output::render_json_pretty(&shown),
        OutputFormat::JsonCompact => output::render_json_compact(&shown),
        OutputFormat::Yaml => output::render_yaml(&shown),
        OutputFormat::Plain | OutputFormat::Csv | OutputFormat::Table => {
            toml::to_string_pretty(&shown)
                .map_err(ConfigError::from)?
                .trim_end()
                .to_owned()
        }
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::effective_path(global).display().to_string(), false);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            output::print_output(&render_config(&cfg, global.output)?, global.quiet);
            Ok(())
        }

        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init { force } => {
            let path = config::effective_path(global);
            if path.exists() && !force {
                return Err(CliError::ConfigExists { path });
            }
            eprintln!("tgstat configuration");
            eprintln!("   Config path: {}\n", path.display());

            let address: String = match global.address {
                Some(ref a) => a.clone(),
                None => Input::new()
                    .with_prompt("Modem address")
                    .default("192.168.1.254".into())
                    .interact_text()
                    .map_err(prompt_err)?,
            };
            let username: String = match global.username {
                Some(ref u) => u.clone(),
                None => Input::new()
                    .with_prompt("Username")
                    .default("admin".into())
                    .interact_text()
                    .map_err(prompt_err)?,
            };

            let password = prompt_password()?;
            let password = prompt_password_storage(&username, password)?;

            let cfg = Config {
                address: Some(address),
                username,
                password,
                timeout: global.timeout.unwrap_or(Config::default().timeout),
                ..Config::default()
            };
            config::save_config(&cfg, &path)?;
            eprintln!("   ✓ Wrote {}", path.display());
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load(global)?;
            let password = prompt_password()?;
            config::store_password(&cfg.username, &password)?;
            eprintln!("   ✓ Password for '{}' stored in system keyring", cfg.username);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn show_masks_password_in_every_format() {
        let cfg = Config {
            address: Some("192.168.1.254".into()),
            password: Some("hunter2".into()),
            ..Config::default()
        };
        for format in [OutputFormat::Plain, OutputFormat::Json, OutputFormat::Yaml] {
            let out = render_config(&cfg, format).unwrap();
            assert!(!out.contains("hunter2"), "{format:?} leaked the password");
            assert!(out.contains("192.168.1.254"));
        }
    }

    #[test]
    fn plain_show_is_toml() {
        let out = render_config(&Config::default(), OutputFormat::Plain).unwrap();
        assert!(out.contains("username = \"admin\""));
        assert!(out.contains("interval = 60"));
    }
}
