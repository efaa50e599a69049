//! CLI module for the Munkireport health report tool
//!
//! Fetches inventory rows (or reads a saved dump), runs the rule engine and
//! prints the machines that need attention.

pub mod commands;
pub mod output;

pub use commands::{ReportCli, ReportCommands};
pub use output::{render_reports, OutputFormat};

use crate::error::CliError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Report produced
    Success = 0,
    /// Some records failed evaluation and `--strict` was given
    RecordErrors = 1,
    /// Input rows are malformed or unreadable
    InvalidInput = 3,
    /// Config file missing, unreadable or incomplete
    ConfigError = 4,
    /// Munkireport rejected the login
    AuthenticationFailed = 5,
    /// Munkireport unreachable or returned an error
    UpstreamError = 6,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Exit code for a finished batch
    pub fn from_batch(has_failures: bool, strict: bool) -> Self {
        if has_failures && strict {
            ExitCode::RecordErrors
        } else {
            ExitCode::Success
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub async fn run(cli: ReportCli) -> Result<ExitCode, CliError> {
    match cli.command {
        ReportCommands::Report {
            config,
            input,
            exclude,
            format,
            strict,
        } => commands::execute_report(config, input, exclude, format, strict).await,
        ReportCommands::Columns => commands::execute_columns(),
        ReportCommands::CheckConfig { config } => commands::execute_check_config(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::RecordErrors), 1);
        assert_eq!(i32::from(ExitCode::AuthenticationFailed), 5);
    }

    #[test]
    fn test_exit_code_from_batch() {
        assert_eq!(ExitCode::from_batch(false, false), ExitCode::Success);
        assert_eq!(ExitCode::from_batch(true, false), ExitCode::Success);
        assert_eq!(ExitCode::from_batch(false, true), ExitCode::Success);
        assert_eq!(ExitCode::from_batch(true, true), ExitCode::RecordErrors);
    }
}
