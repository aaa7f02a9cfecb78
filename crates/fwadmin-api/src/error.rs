use thiserror::Error;

/// Top-level error type for the `fwadmin-api` crate.
///
/// Covers every failure mode of both backends: authentication, transport,
/// vendor rejections and undecodable bodies. `fwadmin-core` maps these into
/// its own taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, missing token, invalid key, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A request was attempted before a token or key was obtained.
    #[error("Not authenticated -- call authenticate first")]
    NotAuthenticated,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS handshake, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-2xx HTTP status or non-success XML status, with the vendor message.
    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected {
        status: u16,
        message: String,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// Response body could not be decoded, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the session token is missing or was refused.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::NotAuthenticated)
    }

    /// Returns `true` if this is a network-level failure that a caller
    /// might choose to retry. Nothing in this crate retries on its own.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}

/// First 200 characters of a response body, for error messages.
pub(crate) fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
