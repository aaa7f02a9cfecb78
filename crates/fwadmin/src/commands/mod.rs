//! Command dispatch for everything that talks to a device.

pub mod config_cmd;
pub mod users;
pub mod util;

use fwadmin_core::{DeviceBackend, DeviceClient, OperationResult};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Route a device command to its handler. The client is already logged in.
pub async fn dispatch(
    cmd: Command,
    client: &DeviceClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Users(args) => users::handle(client, args, global).await,
        Command::Commit => {
            let result = client.commit().await?;
            finish(&result, global)
        }
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

/// Report a mutation. A failed result exits non-zero; structured output
/// formats still print the full result first.
pub(crate) fn finish(result: &OperationResult, global: &GlobalOpts) -> Result<(), CliError> {
    let structured = !matches!(global.output, OutputFormat::Table | OutputFormat::Plain);
    if result.success || structured {
        let out = output::render_result(global.output, result)?;
        output::print_output(&out, global.quiet);
    }
    if result.success {
        Ok(())
    } else {
        if !result.raw_body.is_empty() {
            tracing::debug!(body = %result.raw_body, "device response");
        }
        Err(CliError::OperationFailed {
            message: result.message.clone(),
        })
    }
}
