// ── Runtime device configuration ──
//
// Describes *how* to reach and log in to one device. Carries credential
// data and connection tuning but never touches disk: the CLI builds a
// `DeviceConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;
use crate::model::BackendKind;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification. Default: devices ship self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

/// Login credentials for one session. Never persisted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// Configuration for talking to a single device.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Device root URL (e.g. `https://10.0.0.1`).
    pub url: Url,
    pub backend: BackendKind,
    pub credentials: Credentials,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl DeviceConfig {
    pub fn new(url: Url, backend: BackendKind, credentials: Credentials) -> Self {
        Self {
            url,
            backend,
            credentials,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Turn a bare host (`10.0.0.1`, `fw.example.com:8443`) or full URL into a
/// device root URL. Hosts without a scheme get `https://`.
pub fn device_url(host: &str) -> Result<Url, CoreError> {
    let host = host.trim();
    let candidate = if host.contains("://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    };
    let url = Url::parse(&candidate).map_err(|e| CoreError::Config {
        message: format!("invalid device address '{host}': {e}"),
    })?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(CoreError::Config {
            message: format!("device address '{host}' has no host"),
        });
    }
    Ok(url)
}
