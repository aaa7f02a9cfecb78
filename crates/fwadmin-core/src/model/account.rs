// ── User account domain types ──

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which device management API a client talks to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// REST/JSON API with bearer tokens and deploy jobs.
    Rest,
    /// XML/XPath API with keygen keys and candidate-config commits.
    Xml,
}

impl BackendKind {
    pub(crate) fn api_backend(self) -> fwadmin_api::Backend {
        match self {
            Self::Rest => fwadmin_api::Backend::Rest,
            Self::Xml => fwadmin_api::Backend::Xml,
        }
    }
}

/// Administrative role of an account.
///
/// The REST backend reports and accepts `ADMIN`, `READ_ONLY` and
/// `READ_WRITE`. The XML backend only exposes whether an account is a
/// superuser; everything else reads back as `Unknown`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    ReadOnly,
    ReadWrite,
    Superuser,
    Unknown,
}

impl Role {
    /// Parse a role string from a device response. Unrecognised values map
    /// to [`Role::Unknown`] instead of failing the whole list.
    pub fn from_wire(value: &str) -> Self {
        value.parse().unwrap_or(Self::Unknown)
    }

    /// Whether this role can be written on the given backend.
    pub fn is_assignable_on(self, backend: BackendKind) -> bool {
        match backend {
            BackendKind::Rest => matches!(self, Self::Admin | Self::ReadOnly | Self::ReadWrite),
            BackendKind::Xml => matches!(self, Self::Superuser),
        }
    }
}

/// An administrator account on a device.
///
/// Constructed fresh from every list response, never cached. `password` is
/// write-only: reads never populate it and it is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    /// Device-assigned identifier (REST backend only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub role: Role,
    #[serde(skip)]
    pub password: Option<SecretString>,
}

impl UserAccount {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            id: None,
            name: name.into(),
            role,
            password: None,
        }
    }

    pub fn with_password(mut self, password: SecretString) -> Self {
        self.password = Some(password);
        self
    }
}
