//! CLI configuration -- thin wrapper around `fwadmin_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--host, --backend, --username, etc.).

use secrecy::SecretString;

use fwadmin_core::DeviceConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use fwadmin_config::{Config, Profile, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Layer flag values over a profile. Flags win.
pub fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(backend) = global.backend {
        profile.backend = backend.as_str().into();
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(ref ca) = global.ca_cert {
        profile.ca_cert = Some(ca.clone());
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

/// The profile this invocation talks to: the named profile (if any) with
/// flag overrides applied.
///
/// Without a profile, `--host` alone is enough to build one on the fly. An
/// explicitly requested profile that does not exist is an error.
pub fn effective_profile(
    global: &GlobalOpts,
    config: &Config,
) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);

    let mut profile = match config.profiles.get(&name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => Profile::default(),
    };

    apply_overrides(&mut profile, global);

    if profile.host.trim().is_empty() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }
    Ok((name, profile))
}

/// Translate the effective profile plus the login password into a
/// `DeviceConfig`.
pub fn resolve_device_config(
    profile: &Profile,
    profile_name: &str,
    config: &Config,
    password: SecretString,
) -> Result<DeviceConfig, CliError> {
    Ok(fwadmin_config::profile_to_device_config(
        profile,
        profile_name,
        &config.defaults,
        password,
    )?)
}
