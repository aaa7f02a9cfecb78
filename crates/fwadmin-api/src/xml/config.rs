// XML API config and commit endpoints
//
// Writes land in the candidate config; nothing takes effect until a commit.

use tracing::debug;

use crate::error::Error;
use crate::xml::client::XmlClient;
use crate::xml::codec::{COMMIT_CMD, XmlResponse};

impl XmlClient {
    /// Read the candidate config at `xpath`.
    ///
    /// `GET /api/?type=config&action=get&xpath=..`
    pub async fn get_config(&self, xpath: &str) -> Result<XmlResponse, Error> {
        debug!(xpath, "config get");
        self.call(&[("type", "config"), ("action", "get"), ("xpath", xpath)])
            .await
    }

    /// Merge `element` into the candidate config at `xpath`, creating it if absent.
    ///
    /// `GET /api/?type=config&action=set&xpath=..&element=..`
    pub async fn set_config(&self, xpath: &str, element: &str) -> Result<XmlResponse, Error> {
        debug!(xpath, "config set");
        self.call(&[
            ("type", "config"),
            ("action", "set"),
            ("xpath", xpath),
            ("element", element),
        ])
        .await
    }

    /// Remove the node at `xpath` from the candidate config.
    ///
    /// `GET /api/?type=config&action=delete&xpath=..`
    pub async fn delete_config(&self, xpath: &str) -> Result<XmlResponse, Error> {
        debug!(xpath, "config delete");
        self.call(&[("type", "config"), ("action", "delete"), ("xpath", xpath)])
            .await
    }

    /// Commit the candidate config.
    ///
    /// `GET /api/?type=commit&cmd=<commit></commit>`. Returns once the job
    /// is enqueued; completion is not polled.
    pub async fn commit(&self) -> Result<XmlResponse, Error> {
        debug!("requesting commit");
        self.call(&[("type", "commit"), ("cmd", COMMIT_CMD)]).await
    }
}
