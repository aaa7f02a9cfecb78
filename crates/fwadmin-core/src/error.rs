// ── Core error types ──
//
// Backend-neutral errors from fwadmin-core. Consumers never match on HTTP
// status codes or XML parse failures directly: the `From<fwadmin_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    /// Network-level failure. Fatal to the current operation, never retried.
    #[error("Cannot connect to device at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Device request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// No usable token. Fatal to the whole session.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    /// Malformed response body. The session can continue.
    #[error("Could not decode device response: {message}")]
    Decode { message: String, body: String },

    #[error("User not found: {name}")]
    NotFound { name: String },

    // ── Operation errors ─────────────────────────────────────────────
    /// Non-2xx or non-success status with the vendor message, verbatim.
    #[error("Operation rejected by device: {message}")]
    Rejected { message: String, body: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Refused locally to protect the platform default account.
    #[error("Refusing to delete protected account '{name}'")]
    ProtectedAccount { name: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` if the session cannot continue without a new login.
    pub fn is_fatal_to_session(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fwadmin_api::Error> for CoreError {
    fn from(err: fwadmin_api::Error) -> Self {
        match err {
            fwadmin_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            fwadmin_api::Error::NotAuthenticated => CoreError::AuthenticationFailed {
                message: "not authenticated -- no token for this session".into(),
            },
            fwadmin_api::Error::Transport(e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    let url = e.url().map_or_else(
                        || "<unknown>".into(),
                        |u| fwadmin_api::redact_url(u).to_string(),
                    );
                    let e = e.without_url();
                    let reason = match std::error::Error::source(&e) {
                        Some(cause) => format!("{e}: {cause}"),
                        None => e.to_string(),
                    };
                    CoreError::ConnectionFailed { url, reason }
                }
            }
            fwadmin_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            fwadmin_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            fwadmin_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            fwadmin_api::Error::Rejected { message, body, .. } => {
                CoreError::Rejected { message, body }
            }
            fwadmin_api::Error::Deserialization { message, body } => {
                CoreError::Decode { message, body }
            }
        }
    }
}
