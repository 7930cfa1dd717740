//! Load progress reporting.
//!
//! The loader never logs directly. Every step is reported as a [`LoadEvent`]
//! to the [`LoadObserver`] it was built with; [`TracingObserver`] is the
//! default and turns events into `tracing` records.

use crate::error::{LoadError, WarehouseError};
use crate::warehouse::BulkInsertReport;
use job_core::TableName;
use std::fmt;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Step of a load in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    Reading,
    Connecting,
    EnsuringTable,
    Inserting,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadStage::Reading => "reading",
            LoadStage::Connecting => "connecting",
            LoadStage::EnsuringTable => "ensuring_table",
            LoadStage::Inserting => "inserting",
        };
        f.write_str(name)
    }
}

/// Something that happened during a load.
#[derive(Debug)]
pub enum LoadEvent<'a> {
    ReadStarted {
        path: &'a Path,
    },
    ReadCompleted {
        path: &'a Path,
        rows: usize,
    },
    /// The staging file has a header but no data rows; nothing is loaded.
    EmptyInput {
        path: &'a Path,
        table: &'a TableName,
    },
    Connected {
        table: &'a TableName,
    },
    TableEnsured {
        table: &'a TableName,
    },
    Inserted {
        table: &'a TableName,
        report: BulkInsertReport,
    },
    ConnectionClosed,
    /// Closing an owned session failed, whether or not the load succeeded.
    CloseFailed {
        error: &'a WarehouseError,
    },
    Failed {
        stage: LoadStage,
        path: &'a Path,
        table: &'a TableName,
        rows: usize,
        error: &'a LoadError,
    },
}

impl LoadEvent<'_> {
    /// Short, stable name of the event kind.
    pub fn name(&self) -> &'static str {
        match self {
            LoadEvent::ReadStarted { .. } => "read_started",
            LoadEvent::ReadCompleted { .. } => "read_completed",
            LoadEvent::EmptyInput { .. } => "empty_input",
            LoadEvent::Connected { .. } => "connected",
            LoadEvent::TableEnsured { .. } => "table_ensured",
            LoadEvent::Inserted { .. } => "inserted",
            LoadEvent::ConnectionClosed => "connection_closed",
            LoadEvent::CloseFailed { .. } => "close_failed",
            LoadEvent::Failed { .. } => "failed",
        }
    }
}

/// Receives load events.
pub trait LoadObserver: Send + Sync {
    fn on_event(&self, event: &LoadEvent<'_>);
}

/// Observer that emits structured `tracing` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_event(&self, event: &LoadEvent<'_>) {
        match event {
            LoadEvent::ReadStarted { path } => {
                debug!(path = %path.display(), "Reading staging file");
            }
            LoadEvent::ReadCompleted { path, rows } => {
                info!(path = %path.display(), rows, "Read staging file");
            }
            LoadEvent::EmptyInput { path, table } => {
                info!(
                    path = %path.display(),
                    table = %table,
                    "Staging file has no data rows, skipping load"
                );
            }
            LoadEvent::Connected { table } => {
                info!(table = %table, "Connected to warehouse");
            }
            LoadEvent::TableEnsured { table } => {
                debug!(table = %table, "Table exists");
            }
            LoadEvent::Inserted { table, report } => {
                info!(
                    table = %table,
                    rows = report.rows_inserted,
                    "Successfully loaded rows"
                );
            }
            LoadEvent::ConnectionClosed => {
                debug!("Warehouse connection closed");
            }
            LoadEvent::CloseFailed { error } => {
                warn!(error = %error, "Failed to close warehouse connection");
            }
            LoadEvent::Failed {
                stage,
                path,
                table,
                rows,
                error,
            } => {
                error!(
                    stage = %stage,
                    path = %path.display(),
                    table = %table,
                    rows,
                    error = %error,
                    "Load failed"
                );
            }
        }
    }
}
