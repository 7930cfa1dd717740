//! Staging file reader.

use crate::error::ReadError;
use job_core::Dataset;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a comma-separated staging file with a header row into a [`Dataset`].
///
/// Every record must have as many fields as the header. Cells are kept as
/// raw text; typing happens when the dataset is loaded.
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, ReadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ReadError::NotFound(path.to_path_buf())
        } else {
            ReadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(BufReader::new(file));

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| classify(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if columns.is_empty() {
        return Err(ReadError::Empty(path.to_path_buf()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| classify(path, e))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    debug!(
        "Read {} rows with columns {:?} from {}",
        rows.len(),
        columns,
        path.display()
    );

    Ok(Dataset::new(columns, rows))
}

fn classify(path: &Path, error: csv::Error) -> ReadError {
    let path: PathBuf = path.to_path_buf();
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = error.kind()
    {
        return ReadError::ColumnCount {
            line: pos.as_ref().map(|p| p.line()).unwrap_or_default(),
            expected: *expected_len,
            found: *len,
            path,
        };
    }

    if !error.is_io_error() {
        return ReadError::Malformed {
            path,
            source: error,
        };
    }

    match error.into_kind() {
        csv::ErrorKind::Io(source) => ReadError::Io { path, source },
        kind => ReadError::Io {
            source: std::io::Error::other(format!("{kind:?}")),
            path,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_dataset() {
        let file = csv_file("id,name,age\n1,Alice,30\n2,\"Bob, Jr\",25\n");
        let dataset = read_dataset(file.path()).unwrap();

        assert_eq!(dataset.columns, vec!["id", "name", "age"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows[1], vec!["2", "Bob, Jr", "25"]);
    }

    #[test]
    fn test_read_header_only() {
        let file = csv_file("id,name,age\n");
        let dataset = read_dataset(file.path()).unwrap();

        assert_eq!(dataset.columns.len(), 3);
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_dataset(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ReadError::NotFound(_)));
    }

    #[test]
    fn test_read_directory_keeps_os_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_dataset(dir.path()).unwrap_err();

        match err {
            ReadError::Io { source, .. } => assert!(source.raw_os_error().is_some(), "{source:?}"),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_read_empty_file() {
        let file = csv_file("");
        let err = read_dataset(file.path()).unwrap_err();
        assert!(matches!(err, ReadError::Empty(_)), "got {err:?}");
    }

    #[test]
    fn test_read_inconsistent_columns() {
        let file = csv_file("id,name,age\n1,Alice,30\n2,Bob\n");
        let err = read_dataset(file.path()).unwrap_err();

        match err {
            ReadError::ColumnCount {
                line,
                expected,
                found,
                ..
            } => {
                assert!(line >= 2, "line {line}");
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("expected ColumnCount, got {other:?}"),
        }
    }

    #[test]
    fn test_read_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"id,name\n1,\xff\xfe\n").unwrap();
        file.flush().unwrap();

        let err = read_dataset(file.path()).unwrap_err();
        assert!(matches!(err, ReadError::Malformed { .. }), "got {err:?}");
    }
}
