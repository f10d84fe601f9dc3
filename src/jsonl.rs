// JSONL file operations and the file-backed record source

use crate::error::SourceError;
use crate::record::Record;
use crate::source::RecordSource;
use async_trait::async_trait;
use fs2::FileExt;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Overwrite `path` with one line per record
pub fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> Result<(), SourceError> {
    let file = OpenOptions::new().create(true).write(true).truncate(true).open(path)?;
    file.lock_exclusive()?;

    let mut writer = BufWriter::new(&file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    drop(writer);
    file.sync_all()?;

    info!(file = ?path, count = records.len(), "Wrote JSONL file");
    Ok(())
}

/// Read all records from a JSONL file, returning the latest version per ID
///
/// Records are kept in order of first appearance. A later line for the same
/// id replaces the earlier one in place, and a `{"id": .., "deleted": true}`
/// line removes it (a record re-added after deletion goes to the end).
/// Lines that fail to parse, lack a string id, or don't deserialize to `T`
/// are skipped with a warning.
pub fn read_jsonl_latest<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SourceError> {
    let file = File::open(path)?;
    file.lock_shared()?;
    let reader = BufReader::new(&file);

    let mut slots: Vec<Option<Value>> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(
                    file = ?path,
                    line = line_num + 1,
                    error = ?e,
                    "Failed to read line, skipping"
                );
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let value: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    file = ?path,
                    line = line_num + 1,
                    error = ?e,
                    "Failed to parse JSON, skipping"
                );
                continue;
            }
        };

        let Some(id) = value.get("id").and_then(|v| v.as_str()).map(str::to_string) else {
            warn!(file = ?path, line = line_num + 1, "Line has no string id, skipping");
            continue;
        };

        if value.get("deleted").and_then(|v| v.as_bool()).unwrap_or(false) {
            if let Some(index) = positions.remove(&id) {
                slots[index] = None;
            }
            continue;
        }

        match positions.get(&id) {
            Some(&index) => slots[index] = Some(value),
            None => {
                positions.insert(id, slots.len());
                slots.push(Some(value));
            }
        }
    }

    let mut records = Vec::with_capacity(positions.len());
    for value in slots.into_iter().flatten() {
        match serde_json::from_value::<T>(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(file = ?path, error = ?e, "Skipping record that doesn't match type");
            }
        }
    }

    info!(
        file = ?path,
        count = records.len(),
        "Loaded latest records from JSONL"
    );

    Ok(records)
}

/// Record source backed by a JSONL file
#[derive(Debug, Clone)]
pub struct JsonlSource {
    path: PathBuf,
}

impl JsonlSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/<collection>.jsonl` for record type `T`
    pub fn in_dir<T: Record>(dir: &Path) -> Self {
        Self::new(dir.join(format!("{}.jsonl", T::collection_name())))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T: Record> RecordSource<T> for JsonlSource {
    async fn fetch(&self) -> Result<Vec<T>, SourceError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_jsonl_latest::<T>(&path))
            .await
            .map_err(|e| SourceError::Unavailable(format!("reader task failed: {}", e)))?
    }

    fn describe(&self) -> String {
        format!("jsonl:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, ClientStatus, Document};
    use crate::samples;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn append_lines(path: &Path, lines: &[&str]) {
        let mut file = OpenOptions::new().append(true).open(path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("documents.jsonl");

        write_jsonl(&path, &samples::documents()).unwrap();
        let records: Vec<Document> = read_jsonl_latest(&path).unwrap();
        assert_eq!(records, samples::documents());
    }

    #[test]
    fn test_later_line_replaces_in_place() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("clients.jsonl");
        write_jsonl(&path, &samples::clients()).unwrap();

        append_lines(
            &path,
            &[r#"{"id":"2","name":"Carlos Rodríguez López","email":"carlos.rodriguez@correo.es","status":"inactive","client_type":"particular","pending_documents":0,"monthly_fee":35.0}"#],
        );

        let records: Vec<Client> = read_jsonl_latest(&path).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[1].id, "2");
        assert_eq!(records[1].status, ClientStatus::Inactive);
    }

    #[test]
    fn test_tombstone_removes_record() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("clients.jsonl");
        write_jsonl(&path, &samples::clients()).unwrap();

        append_lines(&path, &[r#"{"id":"3","deleted":true}"#]);
        let records: Vec<Client> = read_jsonl_latest(&path).unwrap();
        let ids: Vec<&str> = records.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "4", "5"]);

        // Re-adding after deletion places the record last
        let readded = serde_json::to_string(&samples::clients()[2]).unwrap();
        append_lines(&path, &[&readded]);
        let records: Vec<Client> = read_jsonl_latest(&path).unwrap();
        assert_eq!(records.last().unwrap().id, "3");
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("clients.jsonl");
        let good = serde_json::to_string(&samples::clients()[0]).unwrap();
        fs::write(
            &path,
            format!("{}\nnot json\n\n{{\"name\":\"no id\"}}\n{{\"id\":\"x\",\"name\":\"wrong shape\"}}\n", good),
        )
        .unwrap();

        let records: Vec<Client> = read_jsonl_latest(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result: Result<Vec<Client>, _> = read_jsonl_latest(&temp.path().join("nope.jsonl"));
        assert!(matches!(result, Err(SourceError::Io(_))));
    }

    #[tokio::test]
    async fn test_jsonl_source_fetch() {
        let temp = TempDir::new().unwrap();
        write_jsonl(&temp.path().join("documents.jsonl"), &samples::documents()).unwrap();

        let source = JsonlSource::in_dir::<Document>(temp.path());
        assert!(source.path().ends_with("documents.jsonl"));

        let records: Vec<Document> = source.fetch().await.unwrap();
        assert_eq!(records.len(), 6);
        assert!(RecordSource::<Document>::describe(&source).starts_with("jsonl:"));
    }
}
