//! Error types for the report CLI

use fleet_health_client::ClientError;
use fleet_health_core::RecordError;
use thiserror::Error;

use crate::cli::ExitCode;
use crate::config::ConfigError;

/// Top-level error for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input rows could not be read or are malformed
    #[error("Input error: {0}")]
    Input(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CliError {
    pub fn input(msg: impl Into<String>) -> Self {
        CliError::Input(msg.into())
    }

    /// Exit code reported for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Config(_) => ExitCode::ConfigError,
            CliError::Input(_) => ExitCode::InvalidInput,
            CliError::Client(err) if err.is_authentication() => ExitCode::AuthenticationFailed,
            CliError::Client(_) => ExitCode::UpstreamError,
            CliError::Serialization(_) => ExitCode::InternalError,
        }
    }
}

impl From<RecordError> for CliError {
    fn from(err: RecordError) -> Self {
        CliError::Input(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Serialization(format!("YAML error: {}", err))
    }
}
