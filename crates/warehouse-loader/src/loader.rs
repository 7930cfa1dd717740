//! CSV-to-warehouse bulk loader.

use crate::connection::Connection;
use crate::error::{FileReadError, LoadError, WarehouseError};
use crate::observer::{LoadEvent, LoadObserver, LoadStage, TracingObserver};
use crate::warehouse::{Warehouse, WarehouseSession};
use job_core::{job_postings_table, RowBatch, TableDefinition, TableName};
use job_csv::read_dataset;
use std::path::Path;
use std::sync::Arc;

/// Result of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Data rows in the staging file
    pub rows_read: usize,
    /// Rows the warehouse reported as inserted
    pub rows_inserted: u64,
    /// True when the file had no data rows and nothing was sent
    pub skipped: bool,
}

/// Loads staging files into a warehouse table.
///
/// A load runs these steps in order, stopping at the first failure:
///
/// ```text
/// Reading ──(no rows)──────────────────────────────────────────▶ Done (skipped)
///    │
///    └──▶ Connecting* ──▶ EnsuringTable ──▶ Inserting ──▶ Closing* ──▶ Done
///              (* owned sessions only; Closing also runs after a failure)
/// ```
///
/// Nothing is retried. Every failure is reported to the observer before it is
/// returned.
pub struct Loader<W> {
    warehouse: W,
    definition: TableDefinition,
    observer: Arc<dyn LoadObserver>,
}

impl<W: Warehouse> Loader<W> {
    /// Create a loader for the job postings table, reporting through `tracing`.
    pub fn new(warehouse: W) -> Self {
        Self {
            warehouse,
            definition: job_postings_table(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Report load events to `observer` instead.
    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn warehouse(&self) -> &W {
        &self.warehouse
    }

    /// Load `file_path` into `table` over a session the loader opens and closes.
    pub async fn load_file<P: AsRef<Path>>(
        &self,
        file_path: P,
        table: &TableName,
    ) -> Result<LoadSummary, LoadError> {
        self.load(file_path, table, Connection::Owned).await
    }

    /// Load `file_path` into `table`.
    ///
    /// The header is matched against the table definition before any
    /// connection is made. A file without data rows succeeds with
    /// [`LoadSummary::skipped`] set and never touches the warehouse.
    pub async fn load<P: AsRef<Path>>(
        &self,
        file_path: P,
        table: &TableName,
        connection: Connection<'_, W::Session>,
    ) -> Result<LoadSummary, LoadError> {
        let path = file_path.as_ref();

        self.emit(LoadEvent::ReadStarted { path });
        let batch = self
            .read(path)
            .map_err(|e| self.fail(LoadStage::Reading, path, table, 0, e))?;
        self.emit(LoadEvent::ReadCompleted {
            path,
            rows: batch.len(),
        });

        if batch.is_empty() {
            self.emit(LoadEvent::EmptyInput { path, table });
            return Ok(LoadSummary {
                rows_read: 0,
                rows_inserted: 0,
                skipped: true,
            });
        }

        match connection {
            Connection::Borrowed(session) => self.write(session, path, table, &batch).await,
            Connection::Owned => {
                let mut session = self.warehouse.connect().await.map_err(|e| {
                    self.fail(
                        LoadStage::Connecting,
                        path,
                        table,
                        batch.len(),
                        LoadError::Connection(e),
                    )
                })?;
                self.emit(LoadEvent::Connected { table });

                let result = self.write(&mut session, path, table, &batch).await;

                match session.close().await {
                    Ok(()) => self.emit(LoadEvent::ConnectionClosed),
                    Err(error) => self.emit(LoadEvent::CloseFailed { error: &error }),
                }

                result
            }
        }
    }

    fn read(&self, path: &Path) -> Result<RowBatch, LoadError> {
        let file_read = |source: FileReadError| LoadError::FileRead {
            path: path.to_path_buf(),
            source,
        };

        let dataset = read_dataset(path).map_err(|e| file_read(e.into()))?;
        dataset
            .project(&self.definition)
            .map_err(|e| file_read(e.into()))
    }

    async fn write(
        &self,
        session: &mut W::Session,
        path: &Path,
        table: &TableName,
        batch: &RowBatch,
    ) -> Result<LoadSummary, LoadError> {
        let rows = batch.len();

        session
            .ensure_table(table, &self.definition)
            .await
            .map_err(|source| {
                let error = LoadError::Schema {
                    table: table.qualified(),
                    source,
                };
                self.fail(LoadStage::EnsuringTable, path, table, rows, error)
            })?;
        self.emit(LoadEvent::TableEnsured { table });

        let insert_error = |source: WarehouseError| {
            let error = LoadError::Insert {
                table: table.qualified(),
                rows,
                source,
            };
            self.fail(LoadStage::Inserting, path, table, rows, error)
        };

        let report = session
            .bulk_insert(table, batch)
            .await
            .map_err(&insert_error)?;
        if !report.success || report.rows_inserted != rows as u64 {
            return Err(insert_error(WarehouseError::RowCountMismatch {
                expected: rows as u64,
                inserted: report.rows_inserted,
            }));
        }
        self.emit(LoadEvent::Inserted { table, report });

        Ok(LoadSummary {
            rows_read: rows,
            rows_inserted: report.rows_inserted,
            skipped: false,
        })
    }

    fn emit(&self, event: LoadEvent<'_>) {
        self.observer.on_event(&event);
    }

    fn fail(
        &self,
        stage: LoadStage,
        path: &Path,
        table: &TableName,
        rows: usize,
        error: LoadError,
    ) -> LoadError {
        self.emit(LoadEvent::Failed {
            stage,
            path,
            table,
            rows,
            error: &error,
        });
        error
    }
}
