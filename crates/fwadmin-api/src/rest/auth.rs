// REST API authentication
//
// OAuth password grant. The token endpoint returns an `access_token` that
// is sent as a bearer header on every later request.

use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::auth::Backend;
use crate::error::Error;
use crate::rest::client::{RestClient, check_status, decode};

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

impl RestClient {
    /// Exchange username/password for a bearer token.
    ///
    /// `POST /api/fdm/latest/fdm/token` with
    /// `{"grant_type": "password", "username": ..., "password": ...}`.
    /// Stateless: the caller stores the token via [`set_token`](Self::set_token).
    pub async fn request_token(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, Error> {
        let url = self.root_url(Backend::Rest.login_path())?;
        debug!("requesting token at {}", url);

        let body = json!({
            "grant_type": "password",
            "username": username,
            "password": password.expose_secret(),
        });

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let resp = self
            .transport()
            .send(Method::POST, url, headers, Some(&body))
            .await?;

        let resp = check_status(resp).map_err(|e| match e {
            Error::Rejected {
                status, message, ..
            } => Error::Authentication {
                message: format!("login failed (HTTP {status}): {message}"),
            },
            other => other,
        })?;

        let token: TokenResponse = decode(&resp)?;
        match token.access_token {
            Some(token) if !token.is_empty() => {
                debug!("login successful");
                Ok(SecretString::from(token))
            }
            _ => Err(Error::Authentication {
                message: "login response did not contain an access_token".into(),
            }),
        }
    }
}
