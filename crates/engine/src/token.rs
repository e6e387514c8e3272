//! Token estimation and accounting.
//!
//! Uses a character-based heuristic (default 4 characters per token,
//! rounded down). It is only used to compare what a view shows against what
//! the store holds, so consistency matters more than accuracy.

use hmem_core::model::Record;
use hmem_core::snapshot::Snapshot;

use crate::cap::CapPolicy;

/// Estimate the token count for a string.
pub fn estimate_tokens(text: &str, chars_per_token: usize) -> usize {
    if text.is_empty() {
        return 0;
    }
    text.chars().count() / chars_per_token.max(1)
}

/// Format a token count for display: `999`, `1.2k`, `57k`.
pub fn format_tokens(n: usize) -> String {
    if n < 1_000 {
        n.to_string()
    } else if n < 10_000 {
        format!("{:.1}k", n as f64 / 1000.0)
    } else {
        format!("{}k", n / 1000)
    }
}

/// Sums token estimates over a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct TokenCounter {
    chars_per_token: usize,
}

impl TokenCounter {
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }

    pub fn estimate(&self, text: &str) -> usize {
        estimate_tokens(text, self.chars_per_token)
    }

    /// Every record body and every node, visible or not.
    pub fn total(&self, snapshot: &Snapshot) -> usize {
        let records: usize = snapshot.records().iter().map(|r| self.estimate(&r.body)).sum();
        let nodes: usize = snapshot.nodes().map(|n| self.estimate(&n.content)).sum();
        records + nodes
    }

    /// The given roots plus whatever of their subtrees survives `policy`.
    pub fn shown<'a>(
        &self,
        snapshot: &Snapshot,
        roots: impl IntoIterator<Item = &'a Record>,
        policy: &CapPolicy<'_>,
    ) -> usize {
        roots
            .into_iter()
            .map(|r| self.estimate(&r.body) + self.subtree(snapshot, &r.id, policy))
            .sum()
    }

    fn subtree(&self, snapshot: &Snapshot, parent_id: &str, policy: &CapPolicy<'_>) -> usize {
        policy
            .apply(snapshot.children_of(parent_id))
            .visible
            .into_iter()
            .map(|n| self.estimate(&n.content) + self.subtree(snapshot, &n.id, policy))
            .sum()
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{children, node, now, record};
    use hmem_config::BulkReadConfig;

    #[test]
    fn empty_string_is_zero() {
        assert_eq!(estimate_tokens("", 4), 0);
    }

    #[test]
    fn rounds_down() {
        assert_eq!(estimate_tokens("abc", 4), 0);
        assert_eq!(estimate_tokens("test", 4), 1);
        assert_eq!(estimate_tokens("hello", 4), 1);
        assert_eq!(estimate_tokens(&"a".repeat(100), 4), 25);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(estimate_tokens("äöüß", 4), 1);
    }

    #[test]
    fn zero_ratio_does_not_divide_by_zero() {
        assert_eq!(estimate_tokens("abcd", 0), 4);
    }

    #[test]
    fn format_thresholds() {
        assert_eq!(format_tokens(0), "0");
        assert_eq!(format_tokens(999), "999");
        assert_eq!(format_tokens(1234), "1.2k");
        assert_eq!(format_tokens(9_999), "10.0k");
        assert_eq!(format_tokens(56_789), "56k");
    }

    #[test]
    fn total_counts_hidden_content() {
        let mut rec = record("P0001", 'P', 1, 0, 0);
        rec.body = "a".repeat(40); // 10 tokens
        let mut obsolete = record("P0002", 'P', 2, 0, 0);
        obsolete.body = "b".repeat(8); // 2 tokens
        obsolete.obsolete = true;
        let mut kid = node("P0001.1", "P0001", "P0001", 2, 1, 0, 0);
        kid.content = "c".repeat(20); // 5 tokens

        let snap = Snapshot::from_parts(vec![rec, obsolete], vec![kid]).unwrap();
        assert_eq!(TokenCounter::default().total(&snap), 17);
    }

    #[test]
    fn shown_respects_capping_at_every_level() {
        let mut root = record("P0001", 'P', 1, 0, 0);
        root.body = String::new();
        let mut nodes = children("P0001", 4);
        // grandchildren under the newest child
        for i in 1..=4u32 {
            nodes.push(node(&format!("P0001.4.{i}"), "P0001.4", "P0001", 3, i, i64::from(4 - i), 0));
        }
        for n in nodes.iter_mut() {
            n.content = "x".repeat(4); // 1 token each
        }

        let snap = Snapshot::from_parts(vec![root], nodes).unwrap();
        let counter = TokenCounter::default();
        let limits = BulkReadConfig {
            top_newest: 2,
            top_accessed: 0,
            ..BulkReadConfig::default()
        };
        let budget = CapPolicy::Budget { limits: &limits, now: now() };

        let shown = counter.shown(&snap, snap.records(), &budget);
        // children 3 and 4 visible, and two of child 4's four children
        assert_eq!(shown, 4);
        assert_eq!(counter.shown(&snap, snap.records(), &CapPolicy::Unbounded), 8);
        assert_eq!(counter.total(&snap), 8);
    }
}
