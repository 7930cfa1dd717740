//! CSV staging files for the job postings ETL.
//!
//! The staging file is the only handoff between generation and loading:
//!
//! - [`write_records`] serializes a generated batch atomically (temporary file
//!   in the destination directory, then rename), so readers never observe a
//!   half-written file.
//! - [`read_dataset`] parses a staging file back into a raw
//!   [`Dataset`](job_core::Dataset) for the loader.
//!
//! # Example
//!
//! ```ignore
//! use job_csv::{read_dataset, write_records};
//!
//! let metrics = write_records(&records, "data/generated/job_postings.csv")?;
//! let dataset = read_dataset("data/generated/job_postings.csv")?;
//! assert_eq!(dataset.len() as u64, metrics.rows_written);
//! ```

mod error;
mod reader;
mod writer;

pub use error::{ReadError, WriteError};
pub use reader::read_dataset;
pub use writer::{write_records, WriteMetrics, DEFAULT_BUFFER_SIZE};
