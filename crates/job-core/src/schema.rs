//! Table definitions and identifiers.
//!
//! Warehouse identifiers are case-insensitive by convention. Every name in
//! this module is normalized to upper case and restricted to plain SQL
//! identifiers, which lets backends emit them unquoted and leave case folding
//! to the server.

use crate::values::ColumnType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Table loaded when the caller does not name one.
pub const DEFAULT_TABLE_NAME: &str = "PUBLIC.JOB_POSTINGS";

// ============================================================================
// Error Types
// ============================================================================

/// Error type for identifier validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The identifier (or one of its dotted parts) is empty
    #[error("Identifier is empty: '{0}'")]
    Empty(String),

    /// The identifier contains characters outside `[A-Za-z0-9_$]` or starts with a digit
    #[error("Invalid identifier '{0}': expected letters, digits, '_' or '$', not starting with a digit")]
    Invalid(String),

    /// More than two dotted parts
    #[error("Table name '{0}' has too many parts; expected TABLE or SCHEMA.TABLE")]
    TooManyParts(String),
}

/// Normalize an identifier to its canonical (upper) case after validating it.
pub fn normalize_identifier(raw: &str) -> Result<String, IdentifierError> {
    let ident = raw.trim();
    let mut chars = ident.chars();
    let first = chars
        .next()
        .ok_or_else(|| IdentifierError::Empty(raw.to_string()))?;

    let valid_first = first.is_ascii_alphabetic() || first == '_';
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if !valid_first || !valid_rest {
        return Err(IdentifierError::Invalid(raw.to_string()));
    }

    Ok(ident.to_ascii_uppercase())
}

// ============================================================================
// Columns and Tables
// ============================================================================

/// A single column of a warehouse table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name, upper case
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered column layout of a warehouse table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    pub fn new(columns: Vec<ColumnDefinition>) -> Self {
        Self { columns }
    }

    /// Column names in definition order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name, ignoring case.
    pub fn get_column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Position of a column by name, ignoring case.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The fixed job postings table layout.
pub fn job_postings_table() -> TableDefinition {
    TableDefinition::new(vec![
        ColumnDefinition::new("JOB_ID", ColumnType::String),
        ColumnDefinition::new("TITLE", ColumnType::String),
        ColumnDefinition::new("COMPANY", ColumnType::String),
        ColumnDefinition::new("LOCATION", ColumnType::String),
        ColumnDefinition::new("SALARY", ColumnType::Integer),
        ColumnDefinition::new("POSTED_DATE", ColumnType::Date),
        ColumnDefinition::new("EMPLOYMENT_TYPE", ColumnType::String),
        ColumnDefinition::new("CREATE_DATE", ColumnType::Timestamp),
    ])
}

// ============================================================================
// Table Names
// ============================================================================

/// A validated, optionally schema-qualified table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    schema: Option<String>,
    name: String,
}

impl TableName {
    /// Parse `TABLE` or `SCHEMA.TABLE`.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let parts: Vec<&str> = raw.trim().split('.').collect();
        match parts.as_slice() {
            [name] => Ok(Self {
                schema: None,
                name: normalize_identifier(name)?,
            }),
            [schema, name] => Ok(Self {
                schema: Some(normalize_identifier(schema)?),
                name: normalize_identifier(name)?,
            }),
            _ => Err(IdentifierError::TooManyParts(raw.to_string())),
        }
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// The unqualified table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `SCHEMA.TABLE` when qualified, otherwise `TABLE`.
    pub fn qualified(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self {
            schema: Some("PUBLIC".to_string()),
            name: "JOB_POSTINGS".to_string(),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

impl FromStr for TableName {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
