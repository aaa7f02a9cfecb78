// REST API HTTP client
//
// Wraps `Transport` with bearer-token headers, `/api/fdm/latest` URL
// construction and vendor error decoding. Endpoint groups (auth, users)
// are implemented as inherent methods in separate files to keep this
// module focused on request mechanics.

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Backend;
use crate::error::{Error, preview};
use crate::rest::models::ErrorBody;
use crate::transport::{RawResponse, Transport, TransportConfig};

/// Raw HTTP client for the device REST API.
///
/// Holds the bearer token once [`request_token`](Self::request_token) has
/// produced one and [`set_token`](Self::set_token) stored it. All methods
/// return decoded payloads; non-2xx responses become [`Error::Rejected`].
#[derive(Debug)]
pub struct RestClient {
    transport: Transport,
    base_url: Url,
    token: Option<SecretString>,
}

impl RestClient {
    /// Create a client for the device at `base_url` (e.g. `https://10.0.0.1`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self::with_transport(Transport::new(transport)?, base_url))
    }

    /// Create a client around an existing transport.
    pub fn with_transport(transport: Transport, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
            token: None,
        }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Store the bearer token attached to every subsequent request.
    pub fn set_token(&mut self, token: SecretString) {
        debug!("storing bearer token");
        self.token = Some(token);
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/fdm/latest/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let prefix = Backend::Rest.api_prefix();
        Ok(Url::parse(&format!("{base}{prefix}/{path}"))?)
    }

    /// Build a device-root URL for a path that already carries the prefix.
    pub(crate) fn root_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn headers(&self) -> Result<HeaderMap, Error> {
        let token = self.token.as_ref().ok_or(Error::NotAuthenticated)?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::Authentication {
                message: "token contains characters not allowed in a header".into(),
            })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Send an authenticated request and fail on non-2xx.
    pub(crate) async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse, Error> {
        let headers = self.headers()?;
        let resp = self.transport.send(method, url, headers, body).await?;
        check_status(resp)
    }

    /// Send an authenticated GET and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let resp = self.request(Method::GET, url, None).await?;
        decode(&resp)
    }
}

/// Map a non-2xx response to the matching error.
///
/// 401 means the token was refused; anything else non-2xx is a rejection
/// carrying the vendor message when the body has the usual error shape.
pub(crate) fn check_status(resp: RawResponse) -> Result<RawResponse, Error> {
    if resp.is_success() {
        return Ok(resp);
    }

    let status = resp.status;
    let body = resp.text();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: "token expired or invalid credentials".into(),
        });
    }

    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|e| e.message())
        .unwrap_or_else(|| format!("HTTP {status}: {}", preview(&body)));

    Err(Error::Rejected {
        status: status.as_u16(),
        message,
        body,
    })
}

/// Decode a JSON body, keeping the raw text on failure.
pub(crate) fn decode<T: DeserializeOwned>(resp: &RawResponse) -> Result<T, Error> {
    serde_json::from_slice(&resp.body).map_err(|e| {
        let body = resp.text();
        Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        }
    })
}
