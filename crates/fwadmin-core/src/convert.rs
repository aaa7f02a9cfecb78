// ── API-to-domain type conversions ──
//
// Bridges raw `fwadmin_api` wire types into `UserAccount`. Passwords only
// ever flow outward: nothing read from a device populates one.

use fwadmin_api::rest::SysUser;
use fwadmin_api::xml::UserEntry;
use secrecy::ExposeSecret;

use crate::model::{Role, UserAccount};

impl From<SysUser> for UserAccount {
    fn from(u: SysUser) -> Self {
        Self {
            id: u.id,
            role: Role::from_wire(&u.role),
            name: u.name,
            password: None,
        }
    }
}

impl From<&UserAccount> for SysUser {
    fn from(account: &UserAccount) -> Self {
        SysUser {
            id: account.id.clone(),
            name: account.name.clone(),
            password: account
                .password
                .as_ref()
                .map(|p| p.expose_secret().to_owned()),
            role: account.role.to_string(),
            kind: fwadmin_api::rest::models::SYSUSER_TYPE.into(),
        }
    }
}

/// The XML API only tells us whether an account holds the superuser role.
impl From<UserEntry> for UserAccount {
    fn from(e: UserEntry) -> Self {
        let role = if e.superuser {
            Role::Superuser
        } else {
            Role::Unknown
        };
        Self::new(e.name, role)
    }
}
