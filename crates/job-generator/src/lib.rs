//! Synthetic job posting generator.
//!
//! This crate provides the [`JobGenerator`] which produces batches of
//! [`JobPostingRecord`](job_core::JobPostingRecord)s. The generator uses a
//! seeded RNG and a fixed reference time, so the same seed and reference time
//! always produce the same batch.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │     JobGenerator     │
//! │                      │
//! │  - rng (StdRng)      │
//! │  - reference_time    │
//! │  - next job_id       │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!   JobPostingRecord { job_id, title, company, ... }
//! ```
//!
//! # Example
//!
//! ```rust
//! use job_generator::JobGenerator;
//!
//! let records = JobGenerator::new(42).generate(10);
//! assert_eq!(records.len(), 10);
//! assert_eq!(records[0].job_id, 1);
//! ```
//!
//! # Field generators
//!
//! - `title`, `employment_type` - uniform choice from the closed catalogs
//! - `company` - surname-based company names (`Smith LLC`, `Lee, Diaz and Park`, ...)
//! - `location` - one of the 50 US states
//! - `salary` - uniform integer in `[90000, 200000]`
//! - `posted_date` - uniform date in the 30 days up to the reference date

pub mod generator;
pub mod generators;

pub use generator::{JobGenerator, RecordIterator, POSTED_WINDOW_DAYS, SALARY_RANGE};
