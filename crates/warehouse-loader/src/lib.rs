//! Bulk loader for CSV staging files.
//!
//! Reads a staging file, matches its header against the job postings table,
//! makes sure the table exists and appends every row in a single bulk
//! operation.
//!
//! # Architecture
//!
//! ```text
//! Loader<W: Warehouse>
//!    │  read_dataset + project    (job-csv, job-core)
//!    │  connect                   (owned sessions only)
//!    ▼
//! WarehouseSession
//!    ├── ensure_table   CREATE TABLE IF NOT EXISTS
//!    ├── bulk_insert    COPY ... FROM STDIN BINARY / in-memory append
//!    └── close
//!
//! Backends: PostgresWarehouse (tokio-postgres), MemoryWarehouse (dry runs, tests)
//! ```
//!
//! Progress and failures are reported to a [`LoadObserver`]; the default
//! [`TracingObserver`] logs them through `tracing`.
//!
//! # Example
//!
//! ```ignore
//! use warehouse_loader::{Loader, PostgresWarehouse, WarehouseConfig};
//!
//! let config = WarehouseConfig::from_toml_file("warehouse.toml")?;
//! let loader = Loader::new(PostgresWarehouse::new(config));
//! let summary = loader
//!     .load_file("data/generated/job_postings.csv", &TableName::default())
//!     .await?;
//! println!("loaded {} rows", summary.rows_inserted);
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod loader;
pub mod memory;
pub mod observer;
pub mod postgres;
pub mod warehouse;

pub use config::{ConfigError, ConnectionSettings, WarehouseConfig};
pub use connection::Connection;
pub use error::{ConnectionError, FileReadError, LoadError, WarehouseError};
pub use loader::{LoadSummary, Loader};
pub use memory::{MemorySession, MemoryTable, MemoryWarehouse};
pub use observer::{LoadEvent, LoadObserver, LoadStage, TracingObserver};
pub use postgres::{PostgresSession, PostgresWarehouse};
pub use warehouse::{BulkInsertReport, Warehouse, WarehouseSession};
