//! Profile configuration for fwadmin.
//!
//! TOML profiles describing how to reach a device, and translation of a
//! profile into `fwadmin_core::DeviceConfig`. Profiles never hold
//! passwords or session tokens; the caller supplies the password for each
//! run.

use std::collections::HashMap;
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

use fwadmin_core::{BackendKind, Credentials, DeviceConfig, TlsVerification, device_url};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no username configured for profile '{profile}'")]
    NoUsername { profile: String },

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

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Accept self-signed device certificates unless a profile says otherwise.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: default_insecure(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_insecure() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}

/// A named device profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Device address: a bare host (`10.0.0.1`) or a full URL.
    pub host: String,

    /// Management API: "rest" or "xml".
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Login name. Falls back to `--username` / `FWADMIN_USERNAME`.
    pub username: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override the defaults' insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override the defaults' timeout, in seconds.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            host: String::new(),
            backend: default_backend(),
            username: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_backend() -> String {
    "rest".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "fwadmin", "fwadmin").map_or_else(
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
    p.push("fwadmin");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. Layers: built-in defaults, the TOML file
/// (if present), then `FWADMIN_*` variables with `__` as the nesting
/// separator (`FWADMIN_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(
            Env::prefixed("FWADMIN_")
                .ignore(&["password", "new_password", "username", "profile", "host"])
                .split("__"),
        );

    Ok(figment.extract()?)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile → DeviceConfig ──────────────────────────────────────────

/// Parse a backend name the way profiles and flags spell it.
pub fn parse_backend(value: &str) -> Result<BackendKind, ConfigError> {
    value.parse().map_err(|_| ConfigError::Validation {
        field: "backend".into(),
        reason: format!("expected 'rest' or 'xml', got '{value}'"),
    })
}

/// TLS policy for a profile: a CA file wins, then the insecure switch.
pub fn tls_for(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build a `DeviceConfig` from a profile and the password for this run.
pub fn profile_to_device_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    password: SecretString,
) -> Result<DeviceConfig, ConfigError> {
    let url = device_url(&profile.host).map_err(|e| ConfigError::Validation {
        field: "host".into(),
        reason: e.to_string(),
    })?;
    let backend = parse_backend(&profile.backend)?;
    let username = profile
        .username
        .clone()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ConfigError::NoUsername {
            profile: profile_name.into(),
        })?;

    let mut config = DeviceConfig::new(url, backend, Credentials { username, password });
    config.tls = tls_for(profile, defaults);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    Ok(config)
}
