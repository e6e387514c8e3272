//! Memory model — root records and the nodes nested beneath them.
//!
//! Field names follow the store's wire format; `prefix` and `level_1` are
//! accepted as aliases for `category` and `body`.

use serde::{Deserialize, Serialize};

use crate::title::auto_title;

/// Role assumed when a record does not name one.
pub const DEFAULT_ROLE: &str = "worker";

/// A root-level memory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique id across the whole store (e.g. `P0007`)
    pub id: String,

    /// Single-letter classifier (P, L, E, ...)
    #[serde(alias = "prefix")]
    pub category: char,

    /// Sequence number, unique within the category
    pub seq: u32,

    /// Creation timestamp as stored
    #[serde(default)]
    pub created_at: String,

    /// Top-level text of the entry
    #[serde(alias = "level_1", default)]
    pub body: String,

    #[serde(default)]
    pub access_count: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<String>,

    #[serde(default)]
    pub favorite: bool,

    #[serde(default)]
    pub obsolete: bool,

    /// Minimum role allowed to read this entry
    #[serde(default = "default_role")]
    pub min_role: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

fn default_role() -> String {
    DEFAULT_ROLE.into()
}

impl Record {
    /// Stored title, or one derived from the body.
    pub fn display_title(&self) -> String {
        display_title(self.title.as_deref(), &self.body)
    }

    pub fn is_active(&self) -> bool {
        !self.obsolete
    }
}

/// Nested content under a record or another node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,

    /// Id of the owning record or node
    pub parent_id: String,

    /// Id of the record at the top of this branch
    pub root_id: String,

    /// Records are depth 1, so every node is at least depth 2
    pub depth: u32,

    /// Sequence number, unique within the parent
    pub seq: u32,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub access_count: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Node {
    /// Stored title, or one derived from the content.
    pub fn display_title(&self) -> String {
        display_title(self.title.as_deref(), &self.content)
    }
}

fn display_title(stored: Option<&str>, text: &str) -> String {
    match stored {
        Some(t) if !t.trim().is_empty() => t.to_string(),
        _ => auto_title(text),
    }
}

/// The fields ranking looks at. Implemented by both records and nodes so the
/// same scoring and ordering rules apply at every level of the tree.
pub trait Scorable {
    fn id(&self) -> &str;
    fn seq(&self) -> u32;
    fn created_at(&self) -> &str;
    fn access_count(&self) -> u64;
}

impl Scorable for Record {
    fn id(&self) -> &str {
        &self.id
    }
    fn seq(&self) -> u32 {
        self.seq
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
    fn access_count(&self) -> u64 {
        self.access_count
    }
}

impl Scorable for Node {
    fn id(&self) -> &str {
        &self.id
    }
    fn seq(&self) -> u32 {
        self.seq
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
    fn access_count(&self) -> u64 {
        self.access_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accepts_store_aliases_and_defaults() {
        let json = r#"{
            "id": "L0003",
            "prefix": "L",
            "seq": 3,
            "created_at": "2025-01-10T08:00:00Z",
            "level_1": "Never run migrations inside a request handler"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.category, 'L');
        assert_eq!(record.body, "Never run migrations inside a request handler");
        assert_eq!(record.access_count, 0);
        assert_eq!(record.min_role, DEFAULT_ROLE);
        assert!(!record.favorite);
        assert!(record.is_active());
    }

    #[test]
    fn stored_title_beats_derived_title() {
        let node = Node {
            id: "P0001.1".into(),
            parent_id: "P0001".into(),
            root_id: "P0001".into(),
            depth: 2,
            seq: 1,
            content: "Architecture — three services behind one gateway".into(),
            created_at: String::new(),
            access_count: 0,
            last_accessed: None,
            title: None,
        };
        assert_eq!(node.display_title(), "Architecture");

        let titled = Node {
            title: Some("Overview".into()),
            ..node
        };
        assert_eq!(titled.display_title(), "Overview");
    }

    #[test]
    fn blank_stored_title_is_ignored() {
        let json = r#"{"id":"E0001","category":"E","seq":1,"body":"OOM in worker pool","title":"  "}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.display_title(), "OOM in worker pool");
    }
}
