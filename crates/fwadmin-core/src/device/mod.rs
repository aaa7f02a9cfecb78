// ── Device client ──
//
// One interface over both management APIs. `DeviceBackend` is the contract;
// `RestDevice` and `XmlDevice` implement it, and `DeviceClient` dispatches to
// whichever one the configuration names.

mod rest;
mod xml;

use std::future::Future;

use secrecy::SecretString;
use tracing::debug;

use fwadmin_api::{TlsMode, TransportConfig};

use crate::config::{DeviceConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{BackendKind, OperationResult, Role, UserAccount};

pub use rest::RestDevice;
pub use xml::XmlDevice;

/// Name of the platform default administrator.
pub const PROTECTED_ACCOUNT: &str = "admin";

/// User-account operations every backend supports.
///
/// Calls are issued one at a time; `authenticate` must succeed before any
/// other operation, otherwise they fail with
/// [`CoreError::AuthenticationFailed`] without touching the network.
pub trait DeviceBackend {
    fn kind(&self) -> BackendKind;

    /// Exchange the configured credentials for a session token.
    fn authenticate(&mut self) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Every account on the device. A device-side rejection yields an empty
    /// list (logged at `warn`); transport, auth and decode failures are errors.
    fn list_users(&self) -> impl Future<Output = Result<Vec<UserAccount>, CoreError>> + Send;

    fn create_user(
        &self,
        name: &str,
        password: &SecretString,
        role: Role,
    ) -> impl Future<Output = Result<OperationResult, CoreError>> + Send;

    fn update_password(
        &self,
        name: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<OperationResult, CoreError>> + Send;

    /// `force` only matters where the backend lets the default account go.
    fn delete_user(
        &self,
        name: &str,
        force: bool,
    ) -> impl Future<Output = Result<OperationResult, CoreError>> + Send;

    /// Push staged changes live (deploy job or candidate-config commit).
    fn commit(&self) -> impl Future<Output = Result<OperationResult, CoreError>> + Send;
}

/// Backend-neutral handle chosen by [`DeviceConfig::backend`].
#[derive(Debug)]
pub enum DeviceClient {
    Rest(RestDevice),
    Xml(XmlDevice),
}

impl DeviceClient {
    /// Build the client for `config.backend`. No network I/O.
    pub fn new(config: &DeviceConfig) -> Result<Self, CoreError> {
        let client = match config.backend {
            BackendKind::Rest => Self::Rest(RestDevice::new(config)?),
            BackendKind::Xml => Self::Xml(XmlDevice::new(config)?),
        };
        debug!(
            backend = %config.backend,
            strategy = ?config.backend.api_backend().auth_strategy(),
            url = %config.url,
            "device client created"
        );
        Ok(client)
    }

    /// Build and authenticate in one step.
    pub async fn connect(config: &DeviceConfig) -> Result<Self, CoreError> {
        let mut client = Self::new(config)?;
        client.authenticate().await?;
        Ok(client)
    }
}

impl DeviceBackend for DeviceClient {
    fn kind(&self) -> BackendKind {
        match self {
            Self::Rest(_) => BackendKind::Rest,
            Self::Xml(_) => BackendKind::Xml,
        }
    }

    async fn authenticate(&mut self) -> Result<(), CoreError> {
        match self {
            Self::Rest(d) => d.authenticate().await,
            Self::Xml(d) => d.authenticate().await,
        }
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>, CoreError> {
        match self {
            Self::Rest(d) => d.list_users().await,
            Self::Xml(d) => d.list_users().await,
        }
    }

    async fn create_user(
        &self,
        name: &str,
        password: &SecretString,
        role: Role,
    ) -> Result<OperationResult, CoreError> {
        match self {
            Self::Rest(d) => d.create_user(name, password, role).await,
            Self::Xml(d) => d.create_user(name, password, role).await,
        }
    }

    async fn update_password(
        &self,
        name: &str,
        password: &SecretString,
    ) -> Result<OperationResult, CoreError> {
        match self {
            Self::Rest(d) => d.update_password(name, password).await,
            Self::Xml(d) => d.update_password(name, password).await,
        }
    }

    async fn delete_user(&self, name: &str, force: bool) -> Result<OperationResult, CoreError> {
        match self {
            Self::Rest(d) => d.delete_user(name, force).await,
            Self::Xml(d) => d.delete_user(name, force).await,
        }
    }

    async fn commit(&self) -> Result<OperationResult, CoreError> {
        match self {
            Self::Rest(d) => d.commit().await,
            Self::Xml(d) => d.commit().await,
        }
    }
}

// ── Shared helpers ───────────────────────────────────────────────────

fn transport_config(config: &DeviceConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}

fn require_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation {
            message: "user name must not be empty".into(),
        });
    }
    Ok(())
}

/// Fold a device rejection into a failed result; everything else stays an error.
fn rejection_to_result<T>(
    result: Result<T, fwadmin_api::Error>,
    on_success: impl FnOnce(T) -> OperationResult,
) -> Result<OperationResult, CoreError> {
    match result {
        Ok(value) => Ok(on_success(value)),
        Err(fwadmin_api::Error::Rejected { status, message, body }) => {
            debug!(status, %message, "operation rejected by device");
            Ok(OperationResult::failure(message, body))
        }
        Err(e) => Err(e.into()),
    }
}
