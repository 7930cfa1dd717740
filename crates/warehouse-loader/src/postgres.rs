//! PostgreSQL-protocol warehouse backend.
//!
//! Settings map onto a PostgreSQL connection as follows:
//!
//! | Setting     | Connection parameter                |
//! |-------------|-------------------------------------|
//! | `account`   | host and port (`host[:port]`)       |
//! | `user`      | user                                |
//! | `password`  | password                            |
//! | `database`  | dbname                              |
//! | `warehouse` | `application_name`                  |
//! | `schema`    | `search_path` (session option)      |
//!
//! Bulk inserts use `COPY ... FROM STDIN BINARY`, which the server applies as
//! one statement: either every row is stored or none is.

use crate::config::{ConnectionSettings, WarehouseConfig};
use crate::error::{ConnectionError, WarehouseError};
use crate::warehouse::{create_table_statement, BulkInsertReport, Warehouse, WarehouseSession};
use async_trait::async_trait;
use job_core::{CellValue, ColumnType, RowBatch, TableDefinition, TableName};
use tokio::task::JoinHandle;
use tokio_postgres::binary_copy::BinaryCopyInWriter;
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error};

/// A warehouse reached over the PostgreSQL wire protocol.
#[derive(Debug, Clone)]
pub struct PostgresWarehouse {
    config: WarehouseConfig,
}

impl PostgresWarehouse {
    pub fn new(config: WarehouseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Warehouse for PostgresWarehouse {
    type Session = PostgresSession;

    async fn connect(&self) -> Result<PostgresSession, ConnectionError> {
        let settings = self.config.validate()?;
        debug!(
            "Connecting to {}:{} as {} (database {}, schema {})",
            settings.host, settings.port, settings.user, settings.database, settings.schema
        );

        let (client, connection) = pg_config(&settings)
            .connect(NoTls)
            .await
            .map_err(|e| ConnectionError::Rejected(e.to_string()))?;

        // Spawn the connection task
        let driver = tokio::spawn(async move {
            let result = connection.await;
            if let Err(e) = &result {
                error!("PostgreSQL connection error: {}", e);
            }
            result
        });

        // Test connection
        if let Err(e) = client.simple_query("SELECT 1").await {
            drop(client);
            driver.abort();
            return Err(ConnectionError::Rejected(e.to_string()));
        }

        Ok(PostgresSession { client, driver })
    }
}

/// An open PostgreSQL session.
///
/// The connection driver task is owned by the session and joined by
/// [`WarehouseSession::close`].
pub struct PostgresSession {
    client: Client,
    driver: JoinHandle<Result<(), tokio_postgres::Error>>,
}

impl PostgresSession {
    /// The underlying client, for statements outside the loader.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl WarehouseSession for PostgresSession {
    async fn ensure_table(
        &mut self,
        table: &TableName,
        definition: &TableDefinition,
    ) -> Result<(), WarehouseError> {
        let sql = create_table_statement(table, definition, sql_type);
        debug!("DDL: {}", sql);
        self.client.batch_execute(&sql).await?;
        Ok(())
    }

    async fn bulk_insert(
        &mut self,
        table: &TableName,
        batch: &RowBatch,
    ) -> Result<BulkInsertReport, WarehouseError> {
        // Convert every cell before the COPY starts so a bad value sends nothing
        let rows = batch.parse_rows()?;
        let types: Vec<Type> = batch
            .columns
            .iter()
            .map(|c| pg_type(c.column_type))
            .collect();
        let params: Vec<Vec<Box<dyn ToSql + Sync + Send>>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&batch.columns)
                    .map(|(value, column)| cell_to_boxed(value, column.column_type))
                    .collect()
            })
            .collect();

        let sql = copy_statement(table, batch);
        debug!("Bulk insert: {} ({} rows)", sql, params.len());

        let sink = self.client.copy_in(&sql).await?;
        let writer = BinaryCopyInWriter::new(sink, &types);
        futures::pin_mut!(writer);

        for row in &params {
            let refs: Vec<&(dyn ToSql + Sync)> = row
                .iter()
                .map(|p| p.as_ref() as &(dyn ToSql + Sync))
                .collect();
            writer.as_mut().write(&refs).await?;
        }

        let rows_inserted = writer.finish().await?;
        Ok(BulkInsertReport {
            success: true,
            rows_inserted,
        })
    }

    async fn close(self) -> Result<(), WarehouseError> {
        let PostgresSession { client, driver } = self;
        // Dropping the client lets the driver send Terminate and finish
        drop(client);
        match driver.await {
            Ok(result) => Ok(result?),
            Err(e) => Err(WarehouseError::Rejected(format!(
                "connection task failed: {e}"
            ))),
        }
    }
}

fn pg_config(settings: &ConnectionSettings) -> tokio_postgres::Config {
    let mut config = tokio_postgres::Config::new();
    config
        .host(settings.host.as_str())
        .port(settings.port)
        .user(settings.user.as_str())
        .password(settings.password.as_str())
        .dbname(settings.database.as_str())
        .application_name(settings.warehouse.as_str())
        .options(format!("-c search_path={}", settings.schema).as_str());
    config
}

fn sql_type(column_type: &ColumnType) -> &'static str {
    match column_type {
        ColumnType::String => "TEXT",
        ColumnType::Integer => "BIGINT",
        ColumnType::Date => "DATE",
        ColumnType::Timestamp => "TIMESTAMP",
    }
}

fn pg_type(column_type: ColumnType) -> Type {
    match column_type {
        ColumnType::String => Type::TEXT,
        ColumnType::Integer => Type::INT8,
        ColumnType::Date => Type::DATE,
        ColumnType::Timestamp => Type::TIMESTAMP,
    }
}

fn copy_statement(table: &TableName, batch: &RowBatch) -> String {
    format!(
        "COPY {} ({}) FROM STDIN BINARY",
        table.qualified(),
        batch.column_names().join(", ")
    )
}

/// Convert a parsed cell to a boxed ToSql trait object.
fn cell_to_boxed(value: CellValue, column_type: ColumnType) -> Box<dyn ToSql + Sync + Send> {
    match value {
        CellValue::Null => match column_type {
            ColumnType::String => Box::new(None::<String>),
            ColumnType::Integer => Box::new(None::<i64>),
            ColumnType::Date => Box::new(None::<chrono::NaiveDate>),
            ColumnType::Timestamp => Box::new(None::<chrono::NaiveDateTime>),
        },
        CellValue::Text(s) => Box::new(s),
        CellValue::Integer(i) => Box::new(i),
        CellValue::Date(d) => Box::new(d),
        CellValue::Timestamp(ts) => Box::new(ts),
    }
}
