//! Write generated batches to staging files and read them back.

use chrono::{TimeZone, Utc};
use job_core::{job_postings_table, ColumnType, JobPostingRecord};
use job_csv::{read_dataset, write_records};
use job_generator::JobGenerator;
use tempfile::TempDir;

fn generate(count: u64) -> Vec<JobPostingRecord> {
    JobGenerator::new(42)
        .with_reference_time(Utc.with_ymd_and_hms(2025, 1, 31, 9, 15, 0).unwrap())
        .generate(count)
}

#[test]
fn test_round_trip_preserves_rows_and_columns() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("generated").join("job_postings.csv");
    let records = generate(250);

    let metrics = write_records(&records, &path).unwrap();
    let dataset = read_dataset(&path).unwrap();

    assert_eq!(metrics.rows_written, 250);
    assert_eq!(dataset.len(), records.len());
    assert_eq!(dataset.columns, JobPostingRecord::COLUMNS.to_vec());
}

#[test]
fn test_round_trip_values_parse_as_table_types() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("job_postings.csv");
    let records = generate(20);

    write_records(&records, &path).unwrap();
    let batch = read_dataset(&path)
        .unwrap()
        .project(&job_postings_table())
        .unwrap();
    let rows = batch.parse_rows().unwrap();

    for (record, row) in records.iter().zip(&rows) {
        assert_eq!(row[0].as_str(), Some(record.job_id.to_string().as_str()));
        assert_eq!(row[1].as_str(), Some(record.title.as_str()));
        assert_eq!(row[2].as_str(), Some(record.company.as_str()));
        assert_eq!(row[3].as_str(), Some(record.location.as_str()));
        assert_eq!(row[4].as_i64(), Some(record.salary));
        assert_eq!(row[5].as_date(), Some(record.posted_date));
        assert_eq!(row[6].as_str(), Some(record.employment_type.as_str()));
        assert_eq!(row[7].as_timestamp(), Some(record.create_date));
    }

    assert_eq!(batch.columns[4].column_type, ColumnType::Integer);
}

#[test]
fn test_empty_batch_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("job_postings.csv");

    write_records(&generate(0), &path).unwrap();
    let dataset = read_dataset(&path).unwrap();

    assert!(dataset.is_empty());
    assert_eq!(dataset.columns.len(), JobPostingRecord::COLUMNS.len());
}

#[test]
fn test_rewrite_replaces_previous_batch() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("job_postings.csv");

    write_records(&generate(100), &path).unwrap();
    write_records(&generate(5), &path).unwrap();

    assert_eq!(read_dataset(&path).unwrap().len(), 5);
}
