// Shared transport for both backends.
//
// Builds the `reqwest::Client` (TLS mode, timeout, user agent) and exposes a
// single `send` primitive returning status + raw body. Backend clients layer
// auth headers/query parameters and response parsing on top.

use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;

/// TLS verification mode.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (firewalls ship with self-signed certs).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("fwadmin/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// Status code and undecoded body of a completed request.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl RawResponse {
    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Thin wrapper over `reqwest::Client`: one request in, status + bytes out.
///
/// Never retries. Network failures surface as [`Error::Transport`], elapsed
/// timeouts as [`Error::Timeout`].
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    timeout: Duration,
}

impl Transport {
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
            timeout: config.timeout,
        })
    }

    /// Wrap a pre-built `reqwest::Client` (tests, custom middleware).
    pub fn with_client(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// Issue a single request and collect the full response body.
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse, Error> {
        debug!("{method} {}", redacted(&url));

        let mut builder = self
            .http
            .request(method, url)
            .headers(headers)
            .timeout(self.timeout);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| self.map_err(e))?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| self.map_err(e))?;

        trace!(%status, len = body.len(), "response received");
        Ok(RawResponse { status, body })
    }

    /// Classify a reqwest failure. The URL kept inside the error has its
    /// query redacted.
    fn map_err(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            return Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            };
        }
        let shown = err.url().map(redact_url);
        let err = match shown {
            Some(url) => err.with_url(url),
            None => err,
        };
        Error::Transport(err)
    }
}

/// Copy of `url` with its query string replaced. Query parameters carry
/// passwords and API keys on the XML backend and must not reach logs or
/// error messages.
pub fn redact_url(url: &Url) -> Url {
    let mut shown = url.clone();
    if shown.query().is_some() {
        shown.set_query(Some("redacted"));
    }
    shown
}

pub(crate) fn redacted(url: &Url) -> String {
    redact_url(url).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn redacted_hides_query() {
        let url = Url::parse("https://fw/api/?type=keygen&user=a&password=secret").unwrap();
        let shown = redacted(&url);
        assert!(!shown.contains("secret"));
        assert!(shown.starts_with("https://fw/api/"));
    }

    #[test]
    fn redacted_keeps_plain_url() {
        let url = Url::parse("https://fw/api/fdm/latest/operational/deploy").unwrap();
        assert_eq!(redacted(&url), "https://fw/api/fdm/latest/operational/deploy");
    }

    #[test]
    fn redact_url_keeps_path() {
        let url = Url::parse("https://fw:8443/api/?type=config&key=K3Y").unwrap();
        let shown = redact_url(&url);
        assert_eq!(shown.path(), "/api/");
        assert_eq!(shown.port(), Some(8443));
        assert_eq!(shown.query(), Some("redacted"));
    }

    #[test]
    fn default_config_accepts_self_signed() {
        let cfg = TransportConfig::default();
        assert!(matches!(cfg.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }
}
