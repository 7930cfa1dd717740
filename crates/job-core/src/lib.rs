//! Core types for the job postings ETL.
//!
//! This crate provides the foundational types shared by the generator, the
//! CSV staging layer and the warehouse loader:
//!
//! - [`JobPostingRecord`] - One synthetic job posting
//! - [`TableDefinition`] / [`ColumnDefinition`] - Warehouse table layout
//! - [`ColumnType`] / [`CellValue`] - Column types and parsed cell values
//! - [`TableName`] - Validated, case-normalized table identifiers
//! - [`Dataset`] / [`RowBatch`] - Raw CSV rows and their projection onto a table
//!
//! # Architecture
//!
//! ```text
//! job-core (this crate)
//!    │
//!    ├─── job-generator     (produces JobPostingRecord batches)
//!    ├─── job-csv           (writes records, reads Datasets)
//!    └─── warehouse-loader  (projects Datasets into RowBatches and loads them)
//! ```

pub mod dataset;
pub mod record;
pub mod schema;
pub mod values;

pub use dataset::{Dataset, ProjectionError, RowBatch, RowError};
pub use record::{JobPostingRecord, EMPLOYMENT_TYPES, JOB_TITLES};
pub use schema::{
    job_postings_table, normalize_identifier, ColumnDefinition, IdentifierError, TableDefinition,
    TableName, DEFAULT_TABLE_NAME,
};
pub use values::{CellError, CellValue, ColumnType};
