//! Error types for staging file I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing a staging file.
#[derive(Error, Debug)]
pub enum WriteError {
    /// IO error on the destination or its temporary file.
    #[error("IO error writing {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// CSV serialization error.
    #[error("CSV error writing {}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

/// Errors that can occur while reading a staging file.
#[derive(Error, Debug)]
pub enum ReadError {
    /// The file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but cannot be read.
    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file has no header row.
    #[error("{} is empty (no header row)", .0.display())]
    Empty(PathBuf),

    /// A record has a different number of fields than the header.
    #[error(
        "{}: line {line} has {found} fields, expected {expected}",
        path.display()
    )]
    ColumnCount {
        path: PathBuf,
        line: u64,
        expected: u64,
        found: u64,
    },

    /// Any other CSV parse failure (invalid UTF-8, bad quoting).
    #[error("malformed CSV in {}", path.display())]
    Malformed { path: PathBuf, source: csv::Error },
}
