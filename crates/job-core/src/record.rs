//! The job posting record produced by the generator.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Closed catalog of job titles.
pub const JOB_TITLES: [&str; 5] = [
    "Data Engineer",
    "Analytics Engineer",
    "BI Developer",
    "SQL Developer",
    "Database Engineer",
];

/// Closed catalog of employment types.
pub const EMPLOYMENT_TYPES: [&str; 3] = ["Full-time", "Part-time", "Contract"];

/// One synthetic job posting.
///
/// Field order is the staging file's column order; serde serializes the
/// fields in declaration order, so the two must not drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPostingRecord {
    pub job_id: u64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: i64,
    pub posted_date: NaiveDate,
    pub employment_type: String,
    pub create_date: NaiveDateTime,
}

impl JobPostingRecord {
    /// Column names as written to the staging file header.
    pub const COLUMNS: [&'static str; 8] = [
        "job_id",
        "title",
        "company",
        "location",
        "salary",
        "posted_date",
        "employment_type",
        "create_date",
    ];
}
