//! Staging file writer.

use crate::error::WriteError;
use job_core::JobPostingRecord;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Default buffer size for CSV writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Metrics from a write operation.
#[derive(Debug, Clone, Default)]
pub struct WriteMetrics {
    /// Number of data rows written (excluding the header).
    pub rows_written: u64,
    /// Final file size in bytes.
    pub file_size_bytes: u64,
    /// Total time taken.
    pub duration: Duration,
}

impl WriteMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Write `records` to `path` as CSV with a header row.
///
/// Missing parent directories are created and an existing file is replaced.
/// The rows are written to a temporary file next to `path`, synced, then
/// renamed over it; if anything fails the destination is left as it was and
/// the temporary file is removed.
pub fn write_records<P: AsRef<Path>>(
    records: &[JobPostingRecord],
    path: P,
) -> Result<WriteMetrics, WriteError> {
    let start_time = Instant::now();
    let path = path.as_ref();
    let io_err = |source: std::io::Error| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source: csv::Error| WriteError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let parent = parent_dir(path);
    std::fs::create_dir_all(&parent).map_err(io_err)?;

    info!(
        "Writing {} job records to {}",
        records.len(),
        path.display()
    );

    let mut temp = NamedTempFile::new_in(&parent).map_err(io_err)?;
    {
        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, temp.as_file_mut());
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(buf_writer);

        // Header is written explicitly so an empty batch still gets one
        writer
            .write_record(JobPostingRecord::COLUMNS)
            .map_err(csv_err)?;

        for (i, record) in records.iter().enumerate() {
            writer.serialize(record).map_err(csv_err)?;
            if (i + 1) % 10000 == 0 {
                debug!("Written {} rows", i + 1);
            }
        }

        writer.flush().map_err(io_err)?;
    }

    temp.as_file().sync_all().map_err(io_err)?;
    let file = temp.persist(path).map_err(|e| io_err(e.error))?;
    let file_size_bytes = file.metadata().map_err(io_err)?.len();

    let metrics = WriteMetrics {
        rows_written: records.len() as u64,
        file_size_bytes,
        duration: start_time.elapsed(),
    };

    info!(
        "Data saved successfully at {}: {} rows, {} bytes in {:?}",
        path.display(),
        metrics.rows_written,
        metrics.file_size_bytes,
        metrics.duration
    );

    Ok(metrics)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(job_id: u64) -> JobPostingRecord {
        JobPostingRecord {
            job_id,
            title: "Data Engineer".to_string(),
            company: "Lee, Diaz and Park".to_string(),
            location: "Texas".to_string(),
            salary: 120_000,
            posted_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            employment_type: "Full-time".to_string(),
            create_date: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_micro_opt(8, 30, 0, 250)
                .unwrap(),
        }
    }

    #[test]
    fn test_write_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.csv");

        let metrics = write_records(&[record(1), record(2)], &path).unwrap();
        assert_eq!(metrics.rows_written, 2);
        assert!(metrics.file_size_bytes > 0);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "job_id,title,company,location,salary,posted_date,employment_type,create_date"
        );
        assert_eq!(
            lines[1],
            "1,Data Engineer,\"Lee, Diaz and Park\",Texas,120000,2025-01-01,Full-time,2025-01-01T08:30:00.000250"
        );
    }

    #[test]
    fn test_write_empty_batch_has_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.csv");

        let metrics = write_records(&[], &path).unwrap();
        assert_eq!(metrics.rows_written, 0);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("generated").join("jobs.csv");

        write_records(&[record(1)], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_overwrites_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.csv");
        std::fs::write(&path, "stale contents\n").unwrap();

        write_records(&[record(1)], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("job_id,"));
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_fails_when_parent_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = write_records(&[record(1)], blocker.join("jobs.csv")).unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
        assert_eq!(
            std::fs::read_to_string(&blocker).unwrap(),
            "not a directory"
        );
    }

    #[test]
    fn test_metrics_rate() {
        let metrics = WriteMetrics {
            rows_written: 1000,
            file_size_bytes: 10,
            duration: Duration::from_secs(10),
        };
        assert_eq!(metrics.rows_per_second(), 100.0);
        assert_eq!(WriteMetrics::default().rows_per_second(), 0.0);
    }
}
