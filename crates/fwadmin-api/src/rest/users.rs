// REST API system-user and deploy endpoints
//
// Collection: `devicesettings/default/sysusers`, single record keyed by the
// device-assigned id, deploy job at `operational/deploy`.

use reqwest::Method;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::rest::client::{RestClient, decode};
use crate::rest::models::{DeployJob, SysUser, SysUserList};
use crate::transport::RawResponse;

const SYSUSERS_PATH: &str = "devicesettings/default/sysusers";

impl RestClient {
    /// List all system users.
    ///
    /// `GET /devicesettings/default/sysusers`
    pub async fn list_sysusers(&self) -> Result<Vec<SysUser>, Error> {
        let url = self.api_url(SYSUSERS_PATH)?;
        debug!("listing sysusers");
        let list: SysUserList = self.get(url).await?;
        Ok(list.items)
    }

    /// Create a system user.
    ///
    /// `POST /devicesettings/default/sysusers` with `{name, password, role, type}`
    pub async fn create_sysuser(&self, user: &SysUser) -> Result<RawResponse, Error> {
        let url = self.api_url(SYSUSERS_PATH)?;
        debug!(name = %user.name, role = %user.role, "creating sysuser");
        let body = to_json(user)?;
        self.request(Method::POST, url, Some(&body)).await
    }

    /// Replace a system user record.
    ///
    /// `PUT /devicesettings/default/sysusers/{id}` -- the body must restate
    /// every field, partial updates are refused by the device.
    pub async fn update_sysuser(&self, id: &str, user: &SysUser) -> Result<RawResponse, Error> {
        let url = self.record_url(id)?;
        debug!(id, name = %user.name, "updating sysuser");
        let body = to_json(user)?;
        self.request(Method::PUT, url, Some(&body)).await
    }

    /// Delete a system user.
    ///
    /// `DELETE /devicesettings/default/sysusers/{id}`
    pub async fn delete_sysuser(&self, id: &str) -> Result<RawResponse, Error> {
        let url = self.record_url(id)?;
        debug!(id, "deleting sysuser");
        self.request(Method::DELETE, url, None).await
    }

    /// Queue a deploy job pushing pending changes to the device.
    ///
    /// `POST /operational/deploy` with `{}`. Returns as soon as the job is
    /// queued; completion is not polled.
    pub async fn deploy(&self) -> Result<(DeployJob, RawResponse), Error> {
        let url = self.api_url("operational/deploy")?;
        debug!("starting deploy job");
        let resp = self.request(Method::POST, url, Some(&json!({}))).await?;
        // The job body is informational only; an empty or odd body still
        // means the job was accepted.
        let job = decode::<DeployJob>(&resp).unwrap_or_default();
        Ok((job, resp))
    }
}

fn to_json(user: &SysUser) -> Result<serde_json::Value, Error> {
    serde_json::to_value(user).map_err(|e| Error::Deserialization {
        message: format!("failed to encode sysuser: {e}"),
        body: String::new(),
    })
}

impl RestClient {
    /// `{base}/api/fdm/latest/devicesettings/default/sysusers/{id}`, with the
    /// id percent-encoded as a single path segment.
    fn record_url(&self, id: &str) -> Result<Url, Error> {
        let mut url = self.api_url(SYSUSERS_PATH)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        Ok(url)
    }
}
