//! Raw tabular data and its projection onto a table definition.

use crate::schema::{ColumnDefinition, TableDefinition};
use crate::values::{CellError, CellValue};
use std::collections::HashSet;

/// Rows read from a staging file, every cell still raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Header names as they appear in the file
    pub columns: Vec<String>,
    /// Data rows; every row has `columns.len()` cells
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Match the header against `table` and reorder cells into its column order.
    ///
    /// Header names are compared ignoring case and surrounding whitespace; the
    /// resulting batch carries the definition's canonical (upper case) names.
    pub fn project(&self, table: &TableDefinition) -> Result<RowBatch, ProjectionError> {
        if self.columns.iter().all(|c| c.trim().is_empty()) {
            return Err(ProjectionError::MissingHeader);
        }

        let mut seen = HashSet::new();
        let mut source_index = vec![None; table.len()];

        for (i, raw) in self.columns.iter().enumerate() {
            let normalized = raw.trim().to_ascii_uppercase();
            if !seen.insert(normalized.clone()) {
                return Err(ProjectionError::DuplicateColumn(normalized));
            }
            match table.position(&normalized) {
                Some(target) => source_index[target] = Some(i),
                None => return Err(ProjectionError::UnknownColumn(raw.clone())),
            }
        }

        let missing: Vec<String> = table
            .columns
            .iter()
            .zip(&source_index)
            .filter(|(_, idx)| idx.is_none())
            .map(|(c, _)| c.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(ProjectionError::MissingColumns(missing));
        }

        let order: Vec<usize> = source_index.into_iter().flatten().collect();
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                if row.len() != self.columns.len() {
                    return Err(ProjectionError::FieldCount {
                        row: row_idx + 1,
                        expected: self.columns.len(),
                        found: row.len(),
                    });
                }
                Ok(order.iter().map(|&i| row[i].clone()).collect())
            })
            .collect::<Result<_, _>>()?;

        Ok(RowBatch {
            columns: table.columns.clone(),
            rows,
        })
    }
}

/// Header or row-shape problems found while projecting a dataset onto a table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    #[error("missing header row")]
    MissingHeader,

    #[error("unexpected column '{0}' in header (is the header row missing?)")]
    UnknownColumn(String),

    #[error("column '{0}' appears more than once in header")]
    DuplicateColumn(String),

    #[error("header is missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// `row` is the 1-based data row number.
    #[error("row {row} has {found} fields, expected {expected}")]
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Rows aligned with a table definition, ready for a bulk insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBatch {
    pub columns: Vec<ColumnDefinition>,
    pub rows: Vec<Vec<String>>,
}

impl RowBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Parse every cell according to its column type.
    ///
    /// Fails on the first cell that does not parse, so callers can reject the
    /// whole batch before sending anything.
    pub fn parse_rows(&self) -> Result<Vec<Vec<CellValue>>, RowError> {
        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, raw)| {
                        column
                            .column_type
                            .parse(raw)
                            .map_err(|source| RowError {
                                row: row_idx + 1,
                                column: column.name.clone(),
                                source,
                            })
                    })
                    .collect()
            })
            .collect()
    }
}

/// A cell in a batch that does not match its column type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("row {row}, column {column}")]
pub struct RowError {
    /// 1-based data row number
    pub row: usize,
    pub column: String,
    pub source: CellError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::job_postings_table;

    fn header() -> Vec<String> {
        [
            "job_id",
            "title",
            "company",
            "location",
            "salary",
            "posted_date",
            "employment_type",
            "create_date",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn row() -> Vec<String> {
        [
            "1",
            "Data Engineer",
            "Acme",
            "TX",
            "120000",
            "2025-01-01",
            "Full-time",
            "2025-01-01T00:00:00",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_project_uppercases_columns() {
        let dataset = Dataset::new(header(), vec![row()]);
        let batch = dataset.project(&job_postings_table()).unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.column_names()[0], "JOB_ID");
        assert_eq!(batch.column_names()[7], "CREATE_DATE");
        assert_eq!(batch.rows[0], row());
    }

    #[test]
    fn test_project_reorders_cells() {
        let mut columns = header();
        let mut cells = row();
        columns.swap(0, 4);
        cells.swap(0, 4);

        let batch = Dataset::new(columns, vec![cells])
            .project(&job_postings_table())
            .unwrap();
        assert_eq!(batch.rows[0], row());
    }

    #[test]
    fn test_project_rejects_data_row_as_header() {
        let dataset = Dataset::new(row(), vec![row()]);
        let err = dataset.project(&job_postings_table()).unwrap_err();
        assert_eq!(err, ProjectionError::UnknownColumn("1".to_string()));
    }

    #[test]
    fn test_project_rejects_missing_and_duplicate_columns() {
        let mut columns = header();
        columns.pop();
        let err = Dataset::new(columns, vec![])
            .project(&job_postings_table())
            .unwrap_err();
        assert_eq!(
            err,
            ProjectionError::MissingColumns(vec!["CREATE_DATE".to_string()])
        );

        let mut columns = header();
        columns[7] = "JOB_ID".to_string();
        let err = Dataset::new(columns, vec![])
            .project(&job_postings_table())
            .unwrap_err();
        assert_eq!(err, ProjectionError::DuplicateColumn("JOB_ID".to_string()));
    }

    #[test]
    fn test_project_rejects_short_row() {
        let mut short = row();
        short.truncate(6);
        let err = Dataset::new(header(), vec![row(), short])
            .project(&job_postings_table())
            .unwrap_err();

        assert_eq!(
            err,
            ProjectionError::FieldCount {
                row: 2,
                expected: 8,
                found: 6,
            }
        );
    }

    #[test]
    fn test_project_rejects_empty_header() {
        let err = Dataset::default()
            .project(&job_postings_table())
            .unwrap_err();
        assert_eq!(err, ProjectionError::MissingHeader);
    }

    #[test]
    fn test_parse_rows_reports_position() {
        let mut bad = row();
        bad[4] = "a lot".to_string();
        let batch = Dataset::new(header(), vec![row(), bad])
            .project(&job_postings_table())
            .unwrap();

        let err = batch.parse_rows().unwrap_err();
        assert_eq!(err.row, 2);
        assert_eq!(err.column, "SALARY");
    }

    #[test]
    fn test_row_error_message_leaves_cause_to_source() {
        use std::error::Error as _;

        let mut bad = row();
        bad[4] = "lots".to_string();
        let err = Dataset::new(header(), vec![bad])
            .project(&job_postings_table())
            .unwrap()
            .parse_rows()
            .unwrap_err();

        assert_eq!(err.to_string(), "row 1, column SALARY");
        assert_eq!(
            err.source().unwrap().to_string(),
            "'lots' is not a valid INTEGER value"
        );
    }

    #[test]
    fn test_parse_rows_types() {
        let batch = Dataset::new(header(), vec![row()])
            .project(&job_postings_table())
            .unwrap();
        let rows = batch.parse_rows().unwrap();

        assert_eq!(rows[0][0].as_str(), Some("1"));
        assert_eq!(rows[0][4].as_i64(), Some(120000));
        assert!(rows[0][5].as_date().is_some());
        assert!(rows[0][7].as_timestamp().is_some());
    }
}
