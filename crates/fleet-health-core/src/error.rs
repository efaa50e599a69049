//! Error types for record evaluation
//!
//! Absent fields are never errors. Only structurally broken rows and numeric
//! fields holding non-numeric text are.

use thiserror::Error;

use crate::record::Field;

/// Errors raised while reading or evaluating an inventory record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Row is shorter than the column list or holds a non-scalar value
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Numeric field holds text that is not an integer
    #[error("Value parse error: {field} has non-numeric value '{value}'")]
    ValueParseError { field: Field, value: String },
}

impl RecordError {
    /// Create a schema error
    pub fn schema_error(msg: impl Into<String>) -> Self {
        RecordError::SchemaError(msg.into())
    }

    /// Create a value parse error for a field
    pub fn value_parse_error(field: Field, value: impl Into<String>) -> Self {
        RecordError::ValueParseError {
            field,
            value: value.into(),
        }
    }

    /// Schema errors fail the whole batch, parse errors only the record
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, RecordError::SchemaError(_))
    }
}

/// Result type alias for record operations
pub type Result<T> = std::result::Result<T, RecordError>;
