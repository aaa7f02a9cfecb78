//! Shared helpers for command handlers.

use std::io::IsTerminal;

use secrecy::{ExposeSecret, SecretString};

use crate::error::CliError;

/// Environment variable holding the login password.
pub const PASSWORD_ENV: &str = "FWADMIN_PASSWORD";

/// Environment variable holding the password for a new or updated account.
pub const NEW_PASSWORD_ENV: &str = "FWADMIN_NEW_PASSWORD";

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

fn from_env(var: &str) -> Option<SecretString> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}

fn prompt(message: &str) -> Result<SecretString, CliError> {
    Ok(SecretString::from(rpassword::prompt_password(message)?))
}

/// Login password: `FWADMIN_PASSWORD`, else a hidden prompt on a terminal.
pub fn login_password(username: &str) -> Result<SecretString, CliError> {
    if let Some(pw) = from_env(PASSWORD_ENV) {
        return Ok(pw);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NoPassword {
            purpose: format!("login as '{username}'"),
            env_var: PASSWORD_ENV.into(),
        });
    }
    prompt(&format!("Password for {username}: "))
}

/// Password for account `name`: `FWADMIN_NEW_PASSWORD`, else prompted twice.
pub fn new_password(name: &str) -> Result<SecretString, CliError> {
    if let Some(pw) = from_env(NEW_PASSWORD_ENV) {
        return Ok(pw);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NoPassword {
            purpose: format!("account '{name}'"),
            env_var: NEW_PASSWORD_ENV.into(),
        });
    }

    let first = prompt(&format!("New password for {name}: "))?;
    if first.expose_secret().is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "must not be empty".into(),
        });
    }
    let second = prompt("Repeat password: ")?;
    if first.expose_secret() != second.expose_secret() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "passwords do not match".into(),
        });
    }
    Ok(first)
}
