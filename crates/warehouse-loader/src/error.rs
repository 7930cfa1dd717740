//! Error types for the loader and its warehouse backends.

use crate::config::ConfigError;
use job_core::{ProjectionError, RowError};
use job_csv::ReadError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to open a warehouse session.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The configuration is incomplete or malformed; nothing was sent.
    #[error("invalid warehouse configuration")]
    Config(#[from] ConfigError),

    /// The warehouse refused or could not complete the handshake.
    #[error("warehouse rejected the connection: {0}")]
    Rejected(String),
}

/// Failure of a statement inside an open session.
#[derive(Error, Debug)]
pub enum WarehouseError {
    /// The warehouse refused the statement.
    #[error("warehouse rejected the statement: {0}")]
    Rejected(String),

    /// A cell does not match its column type; nothing was sent.
    #[error("invalid value")]
    InvalidValue(#[from] RowError),

    /// The bulk operation reported a different number of rows than it was given.
    #[error("bulk insert reported {inserted} rows, expected {expected}")]
    RowCountMismatch { expected: u64, inserted: u64 },

    /// PostgreSQL protocol or server error.
    #[error("PostgreSQL error")]
    Postgres(#[from] tokio_postgres::Error),
}

/// Why a staging file could not be turned into a row batch.
#[derive(Error, Debug)]
pub enum FileReadError {
    #[error(transparent)]
    Read(#[from] ReadError),

    /// The header or a row does not fit the table definition.
    #[error("staging file does not match the table")]
    Header(#[from] ProjectionError),
}

/// Errors returned by [`Loader::load`](crate::Loader::load).
///
/// None of these are retried by the loader.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The staging file is missing, unreadable or malformed.
    #[error("failed to read staging file {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: FileReadError,
    },

    /// A session could not be opened.
    #[error("failed to connect to the warehouse")]
    Connection(#[from] ConnectionError),

    /// The target table could not be created.
    #[error("failed to ensure table {table}")]
    Schema {
        table: String,
        #[source]
        source: WarehouseError,
    },

    /// The bulk insert was rejected.
    #[error("failed to insert {rows} rows into {table}")]
    Insert {
        table: String,
        rows: usize,
        #[source]
        source: WarehouseError,
    },
}
