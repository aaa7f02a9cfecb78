//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use fwadmin_core::OperationResult;

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Color only for interactive terminals, and never when `NO_COLOR` is set.
pub fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via `serde_yaml`
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render the outcome of a mutation. Table and plain modes print the
/// message (plus job id); structured modes serialize the whole result.
pub fn render_result(format: OutputFormat, result: &OperationResult) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(status_line(result, should_color())),
        OutputFormat::Plain => Ok(result.job_id.clone().unwrap_or_else(|| result.message.clone())),
        OutputFormat::Json => render_json(result, false),
        OutputFormat::JsonCompact => render_json(result, true),
        OutputFormat::Yaml => render_yaml(result),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn status_line(result: &OperationResult, color: bool) -> String {
    let mark = match (result.success, color) {
        (true, true) => "ok".green().to_string(),
        (false, true) => "failed".red().to_string(),
        (true, false) => "ok".to_owned(),
        (false, false) => "failed".to_owned(),
    };
    match &result.job_id {
        Some(job) => format!("{mark}: {} (job {job})", result.message),
        None => format!("{mark}: {}", result.message),
    }
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    out.map_err(|e| CliError::Render(e.to_string()))
}

/// YAML output.
fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}
