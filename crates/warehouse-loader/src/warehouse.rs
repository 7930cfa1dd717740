//! Warehouse backend traits.
//!
//! The loader is generic over [`Warehouse`], which hands out
//! [`WarehouseSession`]s. A session is the scoped connection the loader (or
//! its caller) owns for the duration of a load.

use crate::error::{ConnectionError, WarehouseError};
use async_trait::async_trait;
use job_core::{ColumnType, RowBatch, TableDefinition, TableName};

/// Outcome of a bulk insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkInsertReport {
    pub success: bool,
    pub rows_inserted: u64,
}

/// A warehouse the loader can connect to.
///
/// # Usage Pattern
///
/// ```ignore
/// let loader = Loader::new(PostgresWarehouse::new(config));
/// let summary = loader.load_file("jobs.csv", &TableName::default()).await?;
/// ```
#[async_trait]
pub trait Warehouse: Send + Sync {
    type Session: WarehouseSession;

    /// Open a new session.
    ///
    /// Configuration problems are reported as [`ConnectionError::Config`]
    /// before any network traffic.
    async fn connect(&self) -> Result<Self::Session, ConnectionError>;
}

/// An open connection to a warehouse.
#[async_trait]
pub trait WarehouseSession: Send {
    /// Create `table` with `definition` unless it already exists.
    ///
    /// Idempotent; never drops or alters an existing table.
    async fn ensure_table(
        &mut self,
        table: &TableName,
        definition: &TableDefinition,
    ) -> Result<(), WarehouseError>;

    /// Append every row of `batch` to `table` in one bulk operation.
    ///
    /// The batch is applied entirely or not at all, as far as the backend's
    /// bulk primitive guarantees it.
    async fn bulk_insert(
        &mut self,
        table: &TableName,
        batch: &RowBatch,
    ) -> Result<BulkInsertReport, WarehouseError>;

    /// Release the session.
    async fn close(self) -> Result<(), WarehouseError>;
}

/// `CREATE TABLE IF NOT EXISTS` for `definition`, with column types named by
/// `type_name`. Identifiers are emitted unquoted.
pub(crate) fn create_table_statement(
    table: &TableName,
    definition: &TableDefinition,
    type_name: impl Fn(&ColumnType) -> &'static str,
) -> String {
    let columns: Vec<String> = definition
        .columns
        .iter()
        .map(|c| format!("{} {}", c.name, type_name(&c.column_type)))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        table.qualified(),
        columns.join(", ")
    )
}
