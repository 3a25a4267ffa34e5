use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::{ClassificationRecord, HistoryError, HistorySink};

/// Append-only history file, one JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonlHistory {
    path: PathBuf,
}

impl JsonlHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, newest first. A missing file has no records.
    pub fn records(&self) -> Result<Vec<ClassificationRecord>, HistoryError> {
        let f = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(f).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: ClassificationRecord = serde_json::from_str(&line)
                .map_err(|error| HistoryError::Corrupt {
                    line: index + 1,
                    error,
                })?;
            records.push(record);
        }
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    pub fn total_tokens(&self) -> Result<u64, HistoryError> {
        Ok(self.records()?.iter().map(|r| r.total_tokens).sum())
    }

    /// Total tokens of records at or after `cutoff`.
    pub fn tokens_since(&self, cutoff: DateTime<Utc>) -> Result<u64, HistoryError> {
        Ok(self
            .records()?
            .iter()
            .filter(|r| r.timestamp >= cutoff)
            .map(|r| r.total_tokens)
            .sum())
    }
}

impl HistorySink for JsonlHistory {
    fn record(&self, record: &ClassificationRecord) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut f = OpenOptions::new().create(true).append(true).open(&self.path)?;
        f.write_all(&line)?;
        f.sync_all()?;
        Ok(())
    }
}
