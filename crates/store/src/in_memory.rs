//! In-memory source — useful for testing and for callers that already hold
//! the store's rows.

use hmem_core::error::StoreError;
use hmem_core::model::{Node, Record};
use hmem_core::snapshot::{Snapshot, SnapshotData};
use hmem_core::store::SnapshotSource;

/// Holds raw records and nodes; every call to `snapshot` validates a fresh copy.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    data: SnapshotData,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: SnapshotData) -> Self {
        Self { data }
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.data.records.push(record);
        self
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.data.nodes.push(node);
        self
    }
}

impl SnapshotSource for InMemorySource {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        Ok(Snapshot::from_data(self.data.clone())?)
    }
}
