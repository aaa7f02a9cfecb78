// XML API authentication
//
// Keygen: credentials go in the query string of a GET on the API root and
// the device answers with `<response status="success"><result><key>`.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::Error;
use crate::xml::client::XmlClient;

impl XmlClient {
    /// Generate an API key from username/password.
    ///
    /// `GET /api/?type=keygen&user=..&password=..`. Any non-success status
    /// (including HTTP 403 with an XML body) is an authentication failure
    /// carrying the device `<msg>`. Stateless: the caller stores the key via
    /// [`set_key`](Self::set_key).
    pub async fn request_key(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, Error> {
        let url = self.api_url(&[
            ("type", "keygen"),
            ("user", username),
            ("password", password.expose_secret()),
        ])?;
        debug!("requesting API key");

        let resp = self.send(url).await.map_err(|e| match e {
            Error::Rejected { message, .. } => Error::Authentication {
                message: format!("keygen failed: {message}"),
            },
            other => other,
        })?;

        match resp.key {
            Some(key) if !key.is_empty() => {
                debug!("keygen successful");
                Ok(SecretString::from(key))
            }
            _ => Err(Error::Authentication {
                message: "keygen response did not contain a key".into(),
            }),
        }
    }
}
