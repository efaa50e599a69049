//! CLI command definitions
//!
//! Clap-based commands for producing the health report, listing the
//! upstream columns and checking a config file.

use clap::{Parser, Subcommand};
use fleet_health_client::{generate_column_query, DataTablesResponse, MunkireportClient};
use fleet_health_core::{process_data, Field, SystemClock};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::output::{render_reports, OutputFormat};
use super::ExitCode;
use crate::config::{load_config, load_exclusions, DEFAULT_CONFIG_PATH};
use crate::error::CliError;
use crate::logging::LogFormat;

/// Munkireport health report CLI
///
/// Create user-readable reports of machines with storage, disk, battery,
/// uptime, security or sensor problems.
#[derive(Parser, Debug)]
#[command(name = "munkireport-parser")]
#[command(about = "Create user-readable health reports from Munkireport", long_about = None)]
#[command(version)]
pub struct ReportCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: ReportCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Generate the machine health report
    ///
    /// Logs in to Munkireport and evaluates every machine, or evaluates a
    /// saved data table dump when --input is given.
    Report {
        /// Path to configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "MUNKIREPORT_PARSER_CONFIG")]
        config: PathBuf,

        /// Read rows from a saved JSON dump instead of the server
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Additional company to leave out of the report (repeatable)
        #[arg(short, long = "exclude")]
        exclude: Vec<String>,

        /// Output format for the report
        #[arg(long, value_enum, default_value = "yaml")]
        format: OutputFormat,

        /// Exit non-zero when any record failed evaluation
        #[arg(long)]
        strict: bool,
    },

    /// List the upstream columns queried, in order
    Columns,

    /// Load and validate a configuration file
    CheckConfig {
        /// Path to configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "MUNKIREPORT_PARSER_CONFIG")]
        config: PathBuf,
    },
}

/// Saved dump: the server's response body or a bare list of rows
#[derive(Deserialize)]
#[serde(untagged)]
enum InputDump {
    Rows(Vec<Vec<Value>>),
    Table(DataTablesResponse),
}

/// Read rows from a saved data table dump
pub fn read_input(path: &Path) -> Result<Vec<Vec<Value>>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CliError::input(format!(
            "Failed to read input file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let dump: InputDump = serde_json::from_str(&content).map_err(|e| {
        CliError::input(format!(
            "Failed to parse input file '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(match dump {
        InputDump::Rows(rows) => rows,
        InputDump::Table(table) => table.data,
    })
}

/// Execute the report command
pub async fn execute_report(
    config: PathBuf,
    input: Option<PathBuf>,
    exclude: Vec<String>,
    format: OutputFormat,
    strict: bool,
) -> Result<ExitCode, CliError> {
    let (rows, mut excluded) = match input {
        Some(path) => {
            tracing::info!(input = %path.display(), "Reading rows from dump");
            (read_input(&path)?, load_exclusions(&config)?)
        }
        None => {
            let settings = load_config(&config)?;
            let client = MunkireportClient::new(settings.client_config())?;
            (client.fetch_rows().await?, settings.excluded)
        }
    };
    excluded.extend(exclude);

    let outcome = process_data(&rows, &excluded, &SystemClock)?;

    print!("{}", render_reports(&outcome.reports, format)?);

    if outcome.has_failures() {
        eprintln!("{}", outcome.summary());
    }

    Ok(ExitCode::from_batch(outcome.has_failures(), strict))
}

/// Execute the columns command
pub fn execute_columns() -> Result<ExitCode, CliError> {
    for ((key, column), field) in generate_column_query().into_iter().zip(Field::ALL) {
        let kind = if field.is_numeric() { "integer" } else { "text" };
        println!("{:<20} {:<28} {}", key, column, kind);
    }
    Ok(ExitCode::Success)
}

/// Execute the check-config command
pub fn execute_check_config(config: PathBuf) -> Result<ExitCode, CliError> {
    let settings = load_config(&config)?;
    print!("{}", serde_yaml::to_string(&settings.redacted())?);
    Ok(ExitCode::Success)
}
