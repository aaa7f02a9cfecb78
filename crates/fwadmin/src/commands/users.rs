//! User account command handlers.

use tabled::Tabled;

use fwadmin_core::{BackendKind, DeviceBackend, DeviceClient, PROTECTED_ACCOUNT, Role, UserAccount};

use crate::cli::{GlobalOpts, RoleArg, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::{finish, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&UserAccount> for UserRow {
    fn from(u: &UserAccount) -> Self {
        Self {
            name: u.name.clone(),
            role: u.role.to_string(),
            id: u.id.clone().unwrap_or_default(),
        }
    }
}

fn role_for(arg: Option<RoleArg>, backend: BackendKind) -> Role {
    match (arg, backend) {
        (Some(RoleArg::Admin), _) => Role::Admin,
        (Some(RoleArg::ReadOnly), _) => Role::ReadOnly,
        (Some(RoleArg::ReadWrite), _) => Role::ReadWrite,
        (Some(RoleArg::Superuser), _) | (None, BackendKind::Xml) => Role::Superuser,
        (None, BackendKind::Rest) => Role::ReadOnly,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &DeviceClient,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List => {
            let users = client.list_users().await?;
            let out = output::render_list(global.output, &users, |u| UserRow::from(u), |u| {
                u.name.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Create { name, role } => {
            let role = role_for(role, client.kind());
            let password = util::new_password(&name)?;
            let result = client.create_user(&name, &password, role).await?;
            finish(&result, global)
        }

        UsersCommand::Passwd { name } => {
            let password = util::new_password(&name)?;
            let result = client.update_password(&name, &password).await?;
            finish(&result, global)
        }

        UsersCommand::Delete { name, force } => {
            let mut force = force;
            // REST refuses the default account outright; XML asks first.
            if name == PROTECTED_ACCOUNT && client.kind() == BackendKind::Xml && !force {
                if !util::confirm(
                    &format!("Delete the default '{name}' account? You may lock yourself out."),
                    global.yes,
                )? {
                    return Ok(());
                }
                force = true;
            }
            let result = client.delete_user(&name, force).await?;
            finish(&result, global)
        }
    }
}
