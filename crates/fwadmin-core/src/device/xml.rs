// ── XML backend ──
//
// Keygen API key, XPath-addressed config edits on the candidate config,
// changes go live through a commit.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use fwadmin_api::XmlClient;
use fwadmin_api::xml::codec::{USERS_XPATH, is_xpath_safe, password_element, user_xpath};

use super::{DeviceBackend, PROTECTED_ACCOUNT, rejection_to_result, transport_config};
use crate::config::{Credentials, DeviceConfig};
use crate::error::CoreError;
use crate::model::{BackendKind, OperationResult, Role, UserAccount};

#[derive(Debug)]
pub struct XmlDevice {
    client: XmlClient,
    credentials: Credentials,
}

impl XmlDevice {
    pub fn new(config: &DeviceConfig) -> Result<Self, CoreError> {
        let client = XmlClient::new(config.url.clone(), &transport_config(config))?;
        Ok(Self {
            client,
            credentials: config.credentials.clone(),
        })
    }

    /// Write the password (and superuser permission) for `name`. The same
    /// call creates the entry when it does not exist yet.
    async fn set_password(
        &self,
        name: &str,
        password: &SecretString,
        done: &str,
    ) -> Result<OperationResult, CoreError> {
        let xpath = checked_xpath(name)?;
        let element = password_element(password.expose_secret());
        rejection_to_result(self.client.set_config(&xpath, &element).await, |resp| {
            OperationResult::success(format!("{done} (pending commit)"), resp.raw)
        })
    }
}

fn checked_xpath(name: &str) -> Result<String, CoreError> {
    if !is_xpath_safe(name) {
        return Err(CoreError::Validation {
            message: format!("user name {name:?} cannot be used in an XPath expression"),
        });
    }
    Ok(user_xpath(name))
}

impl DeviceBackend for XmlDevice {
    fn kind(&self) -> BackendKind {
        BackendKind::Xml
    }

    async fn authenticate(&mut self) -> Result<(), CoreError> {
        let key = self
            .client
            .request_key(&self.credentials.username, &self.credentials.password)
            .await?;
        self.client.set_key(key);
        debug!(username = %self.credentials.username, "XML API key obtained");
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>, CoreError> {
        match self.client.get_config(USERS_XPATH).await {
            Ok(resp) => Ok(resp.users.into_iter().map(UserAccount::from).collect()),
            Err(fwadmin_api::Error::Rejected { status, message, .. }) => {
                warn!(status, %message, "device refused user list, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create_user(
        &self,
        name: &str,
        password: &SecretString,
        role: Role,
    ) -> Result<OperationResult, CoreError> {
        if role != Role::Superuser {
            warn!(%role, "XML backend always creates superusers, requested role ignored");
        }
        self.set_password(name, password, &format!("user '{name}' created"))
            .await
    }

    async fn update_password(
        &self,
        name: &str,
        password: &SecretString,
    ) -> Result<OperationResult, CoreError> {
        self.set_password(name, password, &format!("password for '{name}' updated"))
            .await
    }

    async fn delete_user(&self, name: &str, force: bool) -> Result<OperationResult, CoreError> {
        let xpath = checked_xpath(name)?;
        if name == PROTECTED_ACCOUNT && !force {
            return Err(CoreError::ProtectedAccount {
                name: name.to_owned(),
            });
        }

        rejection_to_result(self.client.delete_config(&xpath).await, |resp| {
            OperationResult::success(format!("user '{name}' deleted (pending commit)"), resp.raw)
        })
    }

    async fn commit(&self) -> Result<OperationResult, CoreError> {
        rejection_to_result(self.client.commit().await, |resp| {
            debug!(job_id = ?resp.job, "commit job queued");
            let message = resp
                .message
                .clone()
                .unwrap_or_else(|| "commit job started".into());
            OperationResult::success(message, resp.raw).with_job(resp.job)
        })
    }
}
