//! Munkireport health report CLI
//!
//! Wires the config file, the Munkireport client and the rule engine
//! together and renders the machines that need attention.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use cli::{render_reports, ExitCode, OutputFormat, ReportCli, ReportCommands};
pub use config::{load_config, parse_config, ConfigError, ReportConfig};
pub use error::CliError;
pub use logging::{init_tracing, LogFormat};

/// Run the CLI, reporting any error on stderr
pub async fn run_cli(cli: ReportCli) -> ExitCode {
    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}
