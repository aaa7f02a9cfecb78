// REST wire types
//
// JSON shapes for the sysuser collection, deploy jobs and vendor error
// bodies. Unknown response fields are ignored.

use serde::{Deserialize, Serialize};

/// Literal value of the `type` discriminator on every sysuser record.
pub const SYSUSER_TYPE: &str = "sysuser";

/// A system user record as sent to and received from the device.
///
/// `role` stays a raw string so an update can restate whatever the device
/// reported, including roles this crate does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(rename = "type", default = "default_type")]
    pub kind: String,
}

fn default_type() -> String {
    SYSUSER_TYPE.into()
}

impl SysUser {
    /// A record for creation: no id yet, password included.
    pub fn new(name: impl Into<String>, password: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            password: Some(password.into()),
            role: role.into(),
            kind: default_type(),
        }
    }

    /// Full restatement of an existing record with a new password.
    ///
    /// The device refuses partial updates, so id, name and role are carried over.
    pub fn with_password(&self, password: impl Into<String>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            password: Some(password.into()),
            role: self.role.clone(),
            kind: default_type(),
        }
    }
}

/// `GET sysusers` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct SysUserList {
    #[serde(default)]
    pub items: Vec<SysUser>,
}

/// Deploy job as returned by `POST operational/deploy`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeployJob {
    pub id: Option<String>,
    pub state: Option<String>,
}

/// Vendor error body: `{"error":{"severity":..,"key":..,"messages":[..]}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<ErrorInner>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorInner {
    pub key: Option<String>,
    #[serde(default)]
    pub messages: Vec<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorMessage {
    pub description: Option<String>,
}

impl ErrorBody {
    /// Joined message descriptions, falling back to the error key.
    pub fn message(&self) -> Option<String> {
        let inner = self.error.as_ref()?;
        let descriptions: Vec<&str> = inner
            .messages
            .iter()
            .filter_map(|m| m.description.as_deref())
            .collect();
        if descriptions.is_empty() {
            inner.key.clone()
        } else {
            Some(descriptions.join("; "))
        }
    }
}
