//! Shared test fixtures. Timestamps are relative to a fixed `now()`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use hmem_core::model::{Node, Record};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> String {
    (now() - Duration::days(days)).to_rfc3339()
}

pub fn record(id: &str, category: char, seq: u32, age_days: i64, access_count: u64) -> Record {
    Record {
        id: id.into(),
        category,
        seq,
        created_at: days_ago(age_days),
        body: format!("{id} body text"),
        access_count,
        last_accessed: None,
        favorite: false,
        obsolete: false,
        min_role: "worker".into(),
        title: None,
    }
}

pub fn node(id: &str, parent: &str, root: &str, depth: u32, seq: u32, age_days: i64, access_count: u64) -> Node {
    Node {
        id: id.into(),
        parent_id: parent.into(),
        root_id: root.into(),
        depth,
        seq,
        content: format!("{id} node content"),
        created_at: days_ago(age_days),
        access_count,
        last_accessed: None,
        title: None,
    }
}

/// `count` direct children of `root`, child `i` created `count - i` days ago.
pub fn children(root: &str, count: u32) -> Vec<Node> {
    (1..=count)
        .map(|i| node(&format!("{root}.{i}"), root, root, 2, i, i64::from(count - i), 0))
        .collect()
}
