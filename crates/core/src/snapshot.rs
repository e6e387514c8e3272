//! Snapshot arena — one consistent, validated copy of the store.
//!
//! Records keep the order the store delivered them in. Nodes are grouped by
//! parent id, each child list ordered by `seq`. A `Snapshot` can only be built
//! through [`Snapshot::from_parts`], which checks the structural invariants:
//!
//! - ids are unique across records and nodes
//! - every node's parent exists
//! - `depth(node) == depth(parent) + 1`, with records at depth 1
//! - `root_id` matches the root of the parent's branch
//!
//! Depths strictly increase along every parent chain and bottom out at a
//! record, so a validated snapshot is always a forest.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SnapshotError;
use crate::model::{Node, Record};

/// Serializable wire form of a snapshot: records plus a flat node list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    #[serde(default)]
    pub records: Vec<Record>,

    #[serde(default)]
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: Vec<Record>,
    /// Record id → position in `records`
    index: HashMap<String, usize>,
    children: HashMap<String, Vec<Node>>,
    node_count: usize,
}

impl Snapshot {
    /// A snapshot of an empty store.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate and index records and nodes.
    pub fn from_parts(records: Vec<Record>, nodes: Vec<Node>) -> Result<Self, SnapshotError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(records.len() + nodes.len());

        for record in &records {
            if !record.category.is_ascii_alphabetic() {
                return Err(SnapshotError::InvalidCategory {
                    record: record.id.clone(),
                    category: record.category,
                });
            }
            if !seen.insert(record.id.as_str()) {
                return Err(SnapshotError::DuplicateId(record.id.clone()));
            }
        }
        for node in &nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(SnapshotError::DuplicateId(node.id.clone()));
            }
        }

        // (depth, root id) of every possible parent
        let mut anchors: HashMap<&str, (u32, &str)> = HashMap::with_capacity(seen.len());
        for record in &records {
            anchors.insert(record.id.as_str(), (1, record.id.as_str()));
        }
        for node in &nodes {
            anchors.insert(node.id.as_str(), (node.depth, node.root_id.as_str()));
        }

        for node in &nodes {
            let Some(&(parent_depth, parent_root)) = anchors.get(node.parent_id.as_str()) else {
                return Err(SnapshotError::MissingParent {
                    node: node.id.clone(),
                    parent: node.parent_id.clone(),
                });
            };
            let expected = parent_depth.checked_add(1);
            if expected != Some(node.depth) {
                return Err(SnapshotError::DepthMismatch {
                    node: node.id.clone(),
                    declared: node.depth,
                    expected: expected.unwrap_or(u32::MAX),
                });
            }
            if node.root_id != parent_root {
                return Err(SnapshotError::RootMismatch {
                    node: node.id.clone(),
                    declared: node.root_id.clone(),
                    expected: parent_root.to_string(),
                });
            }
        }

        let node_count = nodes.len();
        let mut children: HashMap<String, Vec<Node>> = HashMap::new();
        for node in nodes {
            children.entry(node.parent_id.clone()).or_default().push(node);
        }
        for list in children.values_mut() {
            list.sort_by(|a, b| a.seq.cmp(&b.seq).then_with(|| a.id.cmp(&b.id)));
        }

        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();

        debug!(
            records = records.len(),
            nodes = node_count,
            parents = children.len(),
            "Snapshot built"
        );
        Ok(Self {
            records,
            index,
            children,
            node_count,
        })
    }

    /// Build from the store's `records` + `nodesByParent` shape.
    ///
    /// Each node must name the parent it is listed under.
    pub fn from_nodes_by_parent(
        records: Vec<Record>,
        nodes_by_parent: HashMap<String, Vec<Node>>,
    ) -> Result<Self, SnapshotError> {
        let mut nodes = Vec::new();
        for (parent, list) in nodes_by_parent {
            for node in list {
                if node.parent_id != parent {
                    return Err(SnapshotError::ParentKeyMismatch {
                        node: node.id,
                        listed: parent,
                        declared: node.parent_id,
                    });
                }
                nodes.push(node);
            }
        }
        Self::from_parts(records, nodes)
    }

    pub fn from_data(data: SnapshotData) -> Result<Self, SnapshotError> {
        Self::from_parts(data.records, data.nodes)
    }

    /// Flatten back into the wire form. Nodes come out grouped by parent.
    pub fn into_data(self) -> SnapshotData {
        let mut parents: Vec<String> = self.children.keys().cloned().collect();
        parents.sort();
        let mut children = self.children;
        let nodes = parents
            .iter()
            .filter_map(|p| children.remove(p))
            .flatten()
            .collect();
        SnapshotData {
            records: self.records,
            nodes,
        }
    }

    /// All records, active and obsolete, in store order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn active_records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| r.is_active())
    }

    pub fn obsolete_records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| r.obsolete)
    }

    pub fn record(&self, id: &str) -> Option<&Record> {
        self.index.get(id).and_then(|&i| self.records.get(i))
    }

    /// Direct children of a record or node, ordered by `seq`.
    pub fn children_of(&self, parent_id: &str) -> &[Node] {
        self.children.get(parent_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every node in the snapshot, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.children.values().flatten()
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.node_count == 0
    }
}
