// ── REST backend ──
//
// Token-password grant, JSON sysuser records keyed by device id, changes go
// live through a deploy job.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use fwadmin_api::RestClient;
use fwadmin_api::rest::SysUser;

use super::{DeviceBackend, PROTECTED_ACCOUNT, rejection_to_result, require_name, transport_config};
use crate::config::{Credentials, DeviceConfig};
use crate::error::CoreError;
use crate::model::{BackendKind, OperationResult, Role, UserAccount};

#[derive(Debug)]
pub struct RestDevice {
    client: RestClient,
    credentials: Credentials,
}

impl RestDevice {
    pub fn new(config: &DeviceConfig) -> Result<Self, CoreError> {
        let client = RestClient::new(config.url.clone(), &transport_config(config))?;
        Ok(Self {
            client,
            credentials: config.credentials.clone(),
        })
    }

    /// Locate a record by name. Strict: a rejected list is an error here,
    /// since acting on an empty list would misreport the user as missing.
    async fn find(&self, name: &str) -> Result<Option<SysUser>, CoreError> {
        let users = self.client.list_sysusers().await?;
        Ok(users.into_iter().find(|u| u.name == name))
    }
}

impl DeviceBackend for RestDevice {
    fn kind(&self) -> BackendKind {
        BackendKind::Rest
    }

    async fn authenticate(&mut self) -> Result<(), CoreError> {
        let token = self
            .client
            .request_token(&self.credentials.username, &self.credentials.password)
            .await?;
        self.client.set_token(token);
        debug!(username = %self.credentials.username, "REST session established");
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>, CoreError> {
        match self.client.list_sysusers().await {
            Ok(users) => Ok(users.into_iter().map(UserAccount::from).collect()),
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
        require_name(name)?;
        if !role.is_assignable_on(BackendKind::Rest) {
            return Err(CoreError::Validation {
                message: format!("role {role} is not valid here (use ADMIN, READ_ONLY or READ_WRITE)"),
            });
        }

        let account = UserAccount::new(name, role).with_password(password.clone());
        let record = SysUser::from(&account);
        rejection_to_result(self.client.create_sysuser(&record).await, |resp| {
            OperationResult::success(format!("user '{name}' created"), resp.text())
        })
    }

    async fn update_password(
        &self,
        name: &str,
        password: &SecretString,
    ) -> Result<OperationResult, CoreError> {
        require_name(name)?;
        let existing = self.find(name).await?.ok_or_else(|| CoreError::NotFound {
            name: name.to_owned(),
        })?;
        let id = existing.id.clone().ok_or_else(|| CoreError::Decode {
            message: format!("sysuser '{name}' has no id"),
            body: String::new(),
        })?;

        let record = existing.with_password(password.expose_secret());
        rejection_to_result(self.client.update_sysuser(&id, &record).await, |resp| {
            OperationResult::success(format!("password for '{name}' updated"), resp.text())
        })
    }

    async fn delete_user(&self, name: &str, _force: bool) -> Result<OperationResult, CoreError> {
        require_name(name)?;
        // The device's own default account can never be removed here.
        if name == PROTECTED_ACCOUNT {
            return Err(CoreError::ProtectedAccount {
                name: name.to_owned(),
            });
        }

        let existing = match self.find(name).await {
            Ok(existing) => existing,
            Err(CoreError::Rejected { message, body }) => {
                warn!(%message, "device refused user list, nothing deleted");
                return Ok(OperationResult::failure(message, body));
            }
            Err(e) => return Err(e),
        };
        let Some(id) = existing.and_then(|u| u.id) else {
            return Ok(OperationResult::failure(
                format!("user '{name}' not found"),
                String::new(),
            ));
        };

        rejection_to_result(self.client.delete_sysuser(&id).await, |resp| {
            OperationResult::success(format!("user '{name}' deleted"), resp.text())
        })
    }

    async fn commit(&self) -> Result<OperationResult, CoreError> {
        rejection_to_result(self.client.deploy().await, |(job, resp)| {
            debug!(job_id = ?job.id, state = ?job.state, "deploy job queued");
            OperationResult::success("deployment job started", resp.text()).with_job(job.id)
        })
    }
}
