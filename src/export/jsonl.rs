//! Line-delimited JSON reading and writing.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::ExportError;

/// Reads every non-blank line of `path` as one `T`.
///
/// A line that fails to parse is an [`ExportError::InvalidRecord`] naming its
/// 1-based line number.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ExportError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| ExportError::InvalidRecord {
            path: path.display().to_string(),
            line: i + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Writes `items` to `path`, one compact JSON document per line, replacing
/// any existing file. Returns the number of lines written.
pub fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> Result<usize, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    tracing::debug!(path = %path.display(), lines = items.len(), "Wrote JSONL");
    Ok(items.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        n: u32,
    }

    #[test]
    fn test_write_then_read_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.jsonl");
        write_jsonl(&path, &[Row { n: 1 }, Row { n: 2 }]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"n\":1}\n{\"n\":2}\n");

        fs::write(&path, "{\"n\":1}\n\n{\"n\":2}\n").unwrap();
        let rows: Vec<Row> = read_jsonl(&path).unwrap();
        assert_eq!(rows, vec![Row { n: 1 }, Row { n: 2 }]);
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.jsonl");
        fs::write(&path, "{\"n\":1}\n{oops}\n").unwrap();

        let err = read_jsonl::<Row>(&path).unwrap_err();
        assert!(matches!(err, ExportError::InvalidRecord { line: 2, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = read_jsonl::<Row>(&dir.path().join("nope.jsonl")).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
