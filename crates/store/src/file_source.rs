//! File-based snapshot source — JSON or JSON-lines exports of a store.
//!
//! Two layouts are accepted:
//!
//! - `*.jsonl`: one JSON object per line, tagged with `"kind": "record"` or
//!   `"kind": "node"`
//! - anything else: a single document `{"records": [...], "nodes": [...]}`
//!
//! The whole file is read into memory before the snapshot is built, so no
//! file handle outlives [`SnapshotSource::snapshot`].

use std::path::{Path, PathBuf};

use hmem_core::error::StoreError;
use hmem_core::model::{Node, Record};
use hmem_core::snapshot::{Snapshot, SnapshotData};
use hmem_core::store::SnapshotSource;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One line of a JSON-lines snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotLine {
    Record(Record),
    Node(Node),
}

/// A snapshot source backed by an exported file.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_json_lines(&self) -> bool {
        self.path.extension().is_some_and(|ext| ext == "jsonl")
    }

    fn parse_document(&self, content: &str) -> Result<SnapshotData, StoreError> {
        serde_json::from_str(content).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Parse JSON lines. Corrupted lines are skipped; anything that depended
    /// on them surfaces later as an integrity error.
    fn parse_lines(&self, content: &str) -> SnapshotData {
        let mut data = SnapshotData::default();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SnapshotLine>(line) {
                Ok(SnapshotLine::Record(record)) => data.records.push(record),
                Ok(SnapshotLine::Node(node)) => data.nodes.push(node),
                Err(e) => {
                    warn!(line = number + 1, error = %e, "Skipping corrupted snapshot line");
                }
            }
        }
        data
    }
}

impl SnapshotSource for JsonFileSource {
    fn name(&self) -> &str {
        "json_file"
    }

    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let data = if self.is_json_lines() {
            self.parse_lines(&content)
        } else {
            self.parse_document(&content)?
        };

        debug!(
            path = %self.path.display(),
            records = data.records.len(),
            nodes = data.nodes.len(),
            "Snapshot file loaded"
        );
        Ok(Snapshot::from_data(data)?)
    }
}
