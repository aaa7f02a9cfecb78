//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build a profile from the global connection flags.
fn profile_from_flags(global: &GlobalOpts) -> Result<Profile, CliError> {
    let mut profile = Profile::default();
    config::apply_overrides(&mut profile, global);
    if profile.host.trim().is_empty() {
        return Err(CliError::Validation {
            field: "host".into(),
            reason: "pass --host with the device address".into(),
        });
    }
    // Reject addresses that would only fail later, at connect time.
    fwadmin_core::device_url(&profile.host)?;
    Ok(profile)
}

fn render_config(cfg: &Config, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Table | OutputFormat::Plain => {
            toml::to_string_pretty(cfg).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(cfg).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::JsonCompact => {
            serde_json::to_string(cfg).map_err(|e| CliError::Render(e.to_string()))
        }
        OutputFormat::Yaml => serde_yaml::to_string(cfg).map_err(|e| CliError::Render(e.to_string())),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = render_config(&cfg, global.output)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: fwadmin --host H config add-profile NAME");
            } else {
                let mut names: Vec<&String> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        // ── AddProfile <name> ───────────────────────────────────────
        ConfigCommand::AddProfile { name, default } => {
            let profile = profile_from_flags(global)?;
            let mut cfg = config::load_config()?;

            let replaced = cfg.profiles.insert(name.clone(), profile).is_some();
            if default || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }
            let path = config::save_config(&cfg)?;

            if !global.quiet {
                let verb = if replaced { "Updated" } else { "Added" };
                eprintln!("{verb} profile '{name}' in {}", path.display());
            }
            Ok(())
        }
    }
}
