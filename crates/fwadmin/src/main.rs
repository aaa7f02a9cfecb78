mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fwadmin_core::DeviceClient;

use crate::cli::{Cli, Command};
use crate::error::{CliError, exit_code};

// Single-threaded: one request in flight at a time.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    let code = match run(cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a device connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "fwadmin", &mut std::io::stdout());
            Ok(())
        }

        // All other commands log in first
        cmd => {
            let client = connect(&cli.global).await?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &client, &cli.global).await
        }
    }
}

/// Resolve profile + flags, obtain the login password and authenticate.
async fn connect(global: &cli::GlobalOpts) -> Result<DeviceClient, CliError> {
    let cfg = config::load_config()?;
    let (profile_name, profile) = config::effective_profile(global, &cfg)?;

    let username = profile
        .username
        .clone()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| CliError::NoUsername {
            profile: profile_name.clone(),
        })?;
    let password = commands::util::login_password(&username)?;

    let device_config = config::resolve_device_config(&profile, &profile_name, &cfg, password)?;
    tracing::info!(
        profile = %profile_name,
        backend = %device_config.backend,
        url = %device_config.url,
        "connecting"
    );
    Ok(DeviceClient::connect(&device_config).await?)
}
