// XML API HTTP client
//
// Wraps `Transport` with query-string construction for the single `/api/`
// endpoint and `<response status>` handling. Keygen and config/commit calls
// are inherent methods in `auth.rs` and `config.rs`.

use reqwest::Method;
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::auth::Backend;
use crate::error::{Error, preview};
use crate::transport::{Transport, TransportConfig};
use crate::xml::codec::{XmlResponse, parse_response};

/// Raw HTTP client for the device XML API.
///
/// Every call is a GET on `{base}/api/` with the operation selected by query
/// parameters. Once [`set_key`](Self::set_key) has stored an API key it is
/// appended as the `key` parameter to every request.
#[derive(Debug)]
pub struct XmlClient {
    transport: Transport,
    base_url: Url,
    key: Option<SecretString>,
}

impl XmlClient {
    /// Create a client for the device at `base_url` (e.g. `https://10.0.0.1`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self::with_transport(Transport::new(transport)?, base_url))
    }

    /// Create a client around an existing transport.
    pub fn with_transport(transport: Transport, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
            key: None,
        }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Store the API key attached to every subsequent request.
    pub fn set_key(&mut self, key: SecretString) {
        debug!("storing API key");
        self.key = Some(key);
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// Build `{base}/api/?{params}`.
    pub(crate) fn api_url(&self, params: &[(&str, &str)]) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{}", Backend::Xml.api_prefix()))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    /// Issue an authenticated call and require `status="success"`.
    pub(crate) async fn call(&self, params: &[(&str, &str)]) -> Result<XmlResponse, Error> {
        let key = self.key.as_ref().ok_or(Error::NotAuthenticated)?;
        let mut url = self.api_url(params)?;
        url.query_pairs_mut().append_pair("key", key.expose_secret());
        self.send(url).await
    }

    /// Send a GET and interpret the `<response>` document.
    ///
    /// A parsed document with `status != "success"` is a rejection carrying
    /// the vendor `<msg>`; HTTP 401 means the key was refused.
    pub(crate) async fn send(&self, url: Url) -> Result<XmlResponse, Error> {
        let resp = self
            .transport
            .send(Method::GET, url, HeaderMap::new(), None)
            .await?;
        let status = resp.status;
        let body = resp.text();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "API key expired or invalid".into(),
            });
        }

        match parse_response(&body) {
            Ok(parsed) if parsed.is_success() && status.is_success() => Ok(parsed),
            Ok(parsed) => Err(Error::Rejected {
                status: status.as_u16(),
                message: parsed.message_or_status(),
                body,
            }),
            Err(_) if !status.is_success() => Err(Error::Rejected {
                status: status.as_u16(),
                message: format!("HTTP {status}: {}", preview(&body)),
                body,
            }),
            Err(e) => Err(e),
        }
    }
}
