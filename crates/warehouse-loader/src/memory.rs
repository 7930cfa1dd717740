//! In-process warehouse backend.
//!
//! Used for dry runs and tests. Tables live behind a shared mutex, so clones
//! of a [`MemoryWarehouse`] observe the same state, and every session keeps a
//! log of the statements it would have sent.

use crate::config::DEFAULT_SCHEMA;
use crate::error::{ConnectionError, WarehouseError};
use crate::warehouse::{create_table_statement, BulkInsertReport, Warehouse, WarehouseSession};
use async_trait::async_trait;
use job_core::{CellValue, ColumnType, RowBatch, TableDefinition, TableName};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A table stored in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTable {
    pub definition: TableDefinition,
    pub rows: Vec<Vec<CellValue>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<String, MemoryTable>,
    connections_opened: usize,
    connections_closed: usize,
    statements: Vec<String>,
}

/// In-memory warehouse.
#[derive(Debug, Clone, Default)]
pub struct MemoryWarehouse {
    state: Arc<Mutex<MemoryState>>,
    reject_credentials: bool,
    fail_close: bool,
}

impl MemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every connection attempt, as a warehouse does with bad credentials.
    pub fn rejecting_credentials(mut self) -> Self {
        self.reject_credentials = true;
        self
    }

    /// Make closing a session fail after it has done its work.
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub async fn connections_opened(&self) -> usize {
        self.state.lock().await.connections_opened
    }

    pub async fn connections_closed(&self) -> usize {
        self.state.lock().await.connections_closed
    }

    /// Every statement issued so far, in order.
    pub async fn statements(&self) -> Vec<String> {
        self.state.lock().await.statements.clone()
    }

    pub async fn table(&self, table: &TableName) -> Option<MemoryTable> {
        self.state.lock().await.tables.get(&key(table)).cloned()
    }

    /// Number of rows in `table`; zero if it does not exist.
    pub async fn row_count(&self, table: &TableName) -> usize {
        self.state
            .lock()
            .await
            .tables
            .get(&key(table))
            .map_or(0, |t| t.rows.len())
    }
}

#[async_trait]
impl Warehouse for MemoryWarehouse {
    type Session = MemorySession;

    async fn connect(&self) -> Result<MemorySession, ConnectionError> {
        if self.reject_credentials {
            return Err(ConnectionError::Rejected(
                "incorrect username or password".to_string(),
            ));
        }

        self.state.lock().await.connections_opened += 1;
        Ok(MemorySession {
            state: Arc::clone(&self.state),
            fail_close: self.fail_close,
        })
    }
}

/// A session on a [`MemoryWarehouse`].
#[derive(Debug)]
pub struct MemorySession {
    state: Arc<Mutex<MemoryState>>,
    fail_close: bool,
}

#[async_trait]
impl WarehouseSession for MemorySession {
    async fn ensure_table(
        &mut self,
        table: &TableName,
        definition: &TableDefinition,
    ) -> Result<(), WarehouseError> {
        let mut state = self.state.lock().await;
        state
            .statements
            .push(create_table_statement(table, definition, ColumnType::as_str));

        match state.tables.get(&key(table)) {
            Some(existing) if existing.definition != *definition => {
                Err(WarehouseError::Rejected(format!(
                    "table {} already exists with columns ({})",
                    key(table),
                    existing.definition.column_names().join(", ")
                )))
            }
            Some(_) => Ok(()),
            None => {
                state.tables.insert(
                    key(table),
                    MemoryTable {
                        definition: definition.clone(),
                        rows: Vec::new(),
                    },
                );
                Ok(())
            }
        }
    }

    async fn bulk_insert(
        &mut self,
        table: &TableName,
        batch: &RowBatch,
    ) -> Result<BulkInsertReport, WarehouseError> {
        let mut state = self.state.lock().await;
        state.statements.push(format!(
            "COPY {} ({}) -- {} rows",
            key(table),
            batch.column_names().join(", "),
            batch.len()
        ));

        let stored = state.tables.get_mut(&key(table)).ok_or_else(|| {
            WarehouseError::Rejected(format!("table {} does not exist", key(table)))
        })?;
        if stored.definition.columns != batch.columns {
            return Err(WarehouseError::Rejected(format!(
                "columns ({}) do not match table {}",
                batch.column_names().join(", "),
                key(table)
            )));
        }

        // Validate the whole batch before appending anything
        let rows = batch.parse_rows()?;
        let rows_inserted = rows.len() as u64;
        stored.rows.extend(rows);

        Ok(BulkInsertReport {
            success: true,
            rows_inserted,
        })
    }

    async fn close(self) -> Result<(), WarehouseError> {
        let mut state = self.state.lock().await;
        state.connections_closed += 1;
        if self.fail_close {
            return Err(WarehouseError::Rejected(
                "connection reset while closing".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fully qualified storage key; unqualified names live in the default schema.
fn key(table: &TableName) -> String {
    format!("{}.{}", table.schema().unwrap_or(DEFAULT_SCHEMA), table.name())
}
