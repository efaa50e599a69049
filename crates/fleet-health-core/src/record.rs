//! Inventory record model
//!
//! A record is one row of the Munkireport data table: sixteen nullable
//! scalar columns in a fixed order. Rows are validated once on the way in and
//! then read through [`Field`] names instead of positional indices.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{RecordError, Result};

/// Columns of an inventory row, in upstream query order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    ManifestName,
    SerialNumber,
    MachineModel,
    MachineName,
    ComputerName,
    LongUsername,
    Mountpoint,
    FreeSpaceBytes,
    SmartErrorCount,
    PowerMaxPercent,
    /// Unix seconds of the last check-in
    ReportTimestamp,
    FanStatus,
    SecuritySip,
    PowerCondition,
    PowerCycleCount,
    CommentText,
}

impl Field {
    /// Number of columns in a row
    pub const COUNT: usize = 16;

    /// All fields in column order
    pub const ALL: [Field; Field::COUNT] = [
        Field::ManifestName,
        Field::SerialNumber,
        Field::MachineModel,
        Field::MachineName,
        Field::ComputerName,
        Field::LongUsername,
        Field::Mountpoint,
        Field::FreeSpaceBytes,
        Field::SmartErrorCount,
        Field::PowerMaxPercent,
        Field::ReportTimestamp,
        Field::FanStatus,
        Field::SecuritySip,
        Field::PowerCondition,
        Field::PowerCycleCount,
        Field::CommentText,
    ];

    /// Position of the field in a row
    pub fn index(self) -> usize {
        self as usize
    }

    /// Upstream column name used in the data table query
    pub fn column(self) -> &'static str {
        match self {
            Field::ManifestName => "munkireport.manifestname",
            Field::SerialNumber => "reportdata.serial_number",
            Field::MachineModel => "machine.machine_model",
            Field::MachineName => "machine.machine_name",
            Field::ComputerName => "machine.computer_name",
            Field::LongUsername => "reportdata.long_username",
            Field::Mountpoint => "diskreport.mountpoint",
            Field::FreeSpaceBytes => "diskreport.freespace",
            Field::SmartErrorCount => "smart_stats.error_count",
            Field::PowerMaxPercent => "power.max_percent",
            Field::ReportTimestamp => "reportdata.timestamp",
            Field::FanStatus => "fan_temps.mssf",
            Field::SecuritySip => "security.sip",
            Field::PowerCondition => "power.condition",
            Field::PowerCycleCount => "power.cycle_count",
            Field::CommentText => "comment.text",
        }
    }

    /// Whether rules read this field as an integer
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Field::FreeSpaceBytes
                | Field::SmartErrorCount
                | Field::PowerMaxPercent
                | Field::ReportTimestamp
                | Field::PowerCycleCount
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// One device's inventory row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: [Option<String>; Field::COUNT],
}

impl Record {
    /// Create a record with every field absent
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a record from a raw data table row
    ///
    /// Strings are kept verbatim, numbers and booleans keep their textual
    /// form and `null` becomes an absent field. Trailing columns beyond
    /// [`Field::COUNT`] are ignored.
    pub fn from_row(row: &[Value]) -> Result<Self> {
        if row.len() < Field::COUNT {
            return Err(RecordError::schema_error(format!(
                "row has {} fields, expected {}",
                row.len(),
                Field::COUNT
            )));
        }

        let mut record = Self::empty();
        for field in Field::ALL {
            record.fields[field.index()] = scalar_text(field, &row[field.index()])?;
        }
        Ok(record)
    }

    /// Set a field, returning the updated record
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.fields[field.index()] = Some(value.into());
        self
    }

    /// Clear a field, returning the updated record
    pub fn without(mut self, field: Field) -> Self {
        self.fields[field.index()] = None;
        self
    }

    /// Raw text of a field, `None` when absent
    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields[field.index()].as_deref()
    }

    /// Whether the field holds a value (an empty string counts as present)
    pub fn is_present(&self, field: Field) -> bool {
        self.fields[field.index()].is_some()
    }

    /// Read a field as a signed integer
    ///
    /// Absent and blank fields yield `Ok(None)`. Any other text that does not
    /// parse is a [`RecordError::ValueParseError`].
    pub fn integer(&self, field: Field) -> Result<Option<i64>> {
        match self.get(field).map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => text
                .parse::<i64>()
                .map(Some)
                .map_err(|_| RecordError::value_parse_error(field, text)),
        }
    }
}

fn scalar_text(field: Field, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(RecordError::schema_error(format!(
            "{} holds a non-scalar value",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_row() -> Vec<Value> {
        vec![
            json!("acme/customerA/prod"),
            json!("SN1"),
            json!("MacBookPro16,1"),
            json!("MacBook Pro"),
            json!("host1"),
            json!("Jane Doe"),
            json!("/"),
            json!("19000000000"),
            json!(0),
            json!(null),
            json!("1700000000"),
            json!("0"),
            json!("Enabled"),
            json!("Normal"),
            json!(null),
            json!(null),
        ]
    }

    #[test]
    fn test_field_order_matches_index() {
        for (position, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), position);
        }
        assert_eq!(Field::CommentText.index(), Field::COUNT - 1);
    }

    #[test]
    fn test_from_row_named_access() {
        let record = Record::from_row(&full_row()).unwrap();
        assert_eq!(record.get(Field::ComputerName), Some("host1"));
        assert_eq!(record.get(Field::Mountpoint), Some("/"));
        assert_eq!(record.get(Field::SmartErrorCount), Some("0"));
        assert_eq!(record.get(Field::PowerMaxPercent), None);
        assert!(record.is_present(Field::FanStatus));
        assert!(!record.is_present(Field::CommentText));
    }

    #[test]
    fn test_short_row_is_schema_error() {
        let row = full_row()[..15].to_vec();
        let err = Record::from_row(&row).unwrap_err();
        assert!(matches!(err, RecordError::SchemaError(_)));
        assert!(err.to_string().contains("15 fields"));
    }

    #[test]
    fn test_long_row_ignores_trailing_columns() {
        let mut row = full_row();
        row.push(json!("extra"));
        let record = Record::from_row(&row).unwrap();
        assert_eq!(record.get(Field::CommentText), None);
    }

    #[test]
    fn test_non_scalar_is_schema_error() {
        let mut row = full_row();
        row[Field::CommentText.index()] = json!(["nested"]);
        let err = Record::from_row(&row).unwrap_err();
        assert!(err.to_string().contains("comment.text"));
    }

    #[test]
    fn test_integer_distinguishes_zero_from_absent() {
        let record = Record::empty()
            .with(Field::SmartErrorCount, "0")
            .with(Field::FreeSpaceBytes, "  ");
        assert_eq!(record.integer(Field::SmartErrorCount).unwrap(), Some(0));
        assert_eq!(record.integer(Field::FreeSpaceBytes).unwrap(), None);
        assert_eq!(record.integer(Field::PowerCycleCount).unwrap(), None);
    }

    #[test]
    fn test_integer_rejects_text() {
        let record = Record::empty().with(Field::PowerMaxPercent, "eighty");
        let err = record.integer(Field::PowerMaxPercent).unwrap_err();
        assert_eq!(
            err,
            RecordError::value_parse_error(Field::PowerMaxPercent, "eighty")
        );
    }

    #[test]
    fn test_without_clears_field() {
        let record = Record::empty().with(Field::Mountpoint, "/").without(Field::Mountpoint);
        assert_eq!(record.get(Field::Mountpoint), None);
    }
}
