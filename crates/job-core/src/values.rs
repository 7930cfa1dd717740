//! Column types and cell value parsing.
//!
//! Staging files carry every cell as text. A [`ColumnType`] knows how to turn
//! that text into a [`CellValue`] the warehouse backends can bind. Empty cells
//! are treated as NULL for every type.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Warehouse column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Integer,
    Date,
    Timestamp,
}

impl ColumnType {
    /// Warehouse-neutral type name used in table definitions.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "STRING",
            ColumnType::Integer => "INTEGER",
            ColumnType::Date => "DATE",
            ColumnType::Timestamp => "TIMESTAMP",
        }
    }

    /// Parse a raw CSV cell according to this column type.
    pub fn parse(&self, raw: &str) -> Result<CellValue, CellError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(CellValue::Null);
        }

        match self {
            ColumnType::String => Ok(CellValue::Text(raw.to_string())),
            ColumnType::Integer => parse_integer(trimmed)
                .map(CellValue::Integer)
                .ok_or_else(|| CellError::new(*self, raw)),
            ColumnType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(CellValue::Date)
                .map_err(|_| CellError::new(*self, raw)),
            ColumnType::Timestamp => parse_timestamp(trimmed)
                .map(CellValue::Timestamp)
                .ok_or_else(|| CellError::new(*self, raw)),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed cell, ready to be bound by a warehouse backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Null,
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl CellValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

/// A cell that does not parse as its column type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {column_type} value")]
pub struct CellError {
    pub column_type: ColumnType,
    pub value: String,
}

impl CellError {
    fn new(column_type: ColumnType, value: &str) -> Self {
        Self {
            column_type,
            value: value.to_string(),
        }
    }
}

/// Integers may arrive as `120000` or, from some exporters, `120000.0`.
fn parse_integer(s: &str) -> Option<i64> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    let (whole, fraction) = s.split_once('.')?;
    if fraction.chars().all(|c| c == '0') {
        whole.parse::<i64>().ok()
    } else {
        None
    }
}

/// Parse a timestamp in the formats the staging files are known to contain.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Some(ts);
        }
    }

    // RFC 3339 with an offset is normalized to UTC
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_empty_cell_is_null() {
        for column_type in [
            ColumnType::String,
            ColumnType::Integer,
            ColumnType::Date,
            ColumnType::Timestamp,
        ] {
            assert_eq!(column_type.parse("").unwrap(), CellValue::Null);
            assert_eq!(column_type.parse("  ").unwrap(), CellValue::Null);
        }
    }

    #[test]
    fn test_parse_string_keeps_raw_text() {
        let value = ColumnType::String.parse(" Acme, Inc ").unwrap();
        assert_eq!(value.as_str(), Some(" Acme, Inc "));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(ColumnType::Integer.parse("120000").unwrap().as_i64(), Some(120000));
        assert_eq!(ColumnType::Integer.parse("120000.0").unwrap().as_i64(), Some(120000));
        assert!(ColumnType::Integer.parse("120000.5").is_err());
        assert!(ColumnType::Integer.parse("lots").is_err());
    }

    #[test]
    fn test_parse_date() {
        let value = ColumnType::Date.parse("2025-01-01").unwrap();
        assert_eq!(value.as_date(), NaiveDate::from_ymd_opt(2025, 1, 1));

        let err = ColumnType::Date.parse("01/01/2025").unwrap_err();
        assert_eq!(err.column_type, ColumnType::Date);
        assert_eq!(err.to_string(), "'01/01/2025' is not a valid DATE value");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        for raw in [
            "2025-01-01T00:00:00",
            "2025-01-01 00:00:00",
            "2025-01-01T00:00:00Z",
            "2025-01-01T02:00:00+02:00",
            "2025-01-01",
        ] {
            assert_eq!(
                ColumnType::Timestamp.parse(raw).unwrap().as_timestamp(),
                Some(expected),
                "failed for {raw}"
            );
        }
    }

    #[test]
    fn test_parse_timestamp_keeps_fraction() {
        let value = ColumnType::Timestamp
            .parse("2025-03-04 05:06:07.123456")
            .unwrap();
        let ts = value.as_timestamp().unwrap();
        assert_eq!(ts.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(ColumnType::String.to_string(), "STRING");
        assert_eq!(ColumnType::Integer.to_string(), "INTEGER");
        assert_eq!(ColumnType::Date.to_string(), "DATE");
        assert_eq!(ColumnType::Timestamp.to_string(), "TIMESTAMP");
    }
}
