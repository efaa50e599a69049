//! Client errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed with status {status}")]
    Authentication { status: u16 },

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// Whether the server rejected the credentials or URL at login
    pub fn is_authentication(&self) -> bool {
        matches!(self, ClientError::Authentication { .. })
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
