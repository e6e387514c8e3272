//! Budgeted selection of root records.
//!
//! Per category, over active records only:
//!
//! 1. the `top_newest` newest records become visible
//! 2. the `top_accessed` highest-scoring records with accesses become visible
//!    and promoted
//! 3. every favorite becomes visible, regardless of caps
//!
//! Categories never share a budget. Obsolete records are ranked by score
//! across all categories and the first `top_obsolete` are shown.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use hmem_config::BulkReadConfig;
use hmem_core::model::Record;
use hmem_core::time::parse_timestamp;
use serde::Serialize;
use tracing::{debug, warn};

use crate::rank;

/// Result of one selection pass. Recomputed per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Visible active record ids
    pub visible: BTreeSet<String>,
    /// Subset of `visible` chosen by access score
    pub promoted: BTreeSet<String>,
    /// Visible obsolete record ids, highest score first
    pub visible_obsolete: Vec<String>,
}

impl Selection {
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.contains(id)
    }

    pub fn is_promoted(&self, id: &str) -> bool {
        self.promoted.contains(id)
    }

    /// Number of root records shown, active and obsolete.
    pub fn shown_count(&self) -> usize {
        self.visible.len() + self.visible_obsolete.len()
    }
}

/// Choose the visible root records.
pub fn select(records: &[Record], limits: &BulkReadConfig, now: DateTime<Utc>) -> Selection {
    let mut selection = Selection::default();

    let mut by_category: BTreeMap<char, Vec<&Record>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.is_active()) {
        by_category.entry(record.category).or_default().push(record);
    }

    for (category, entries) in &by_category {
        let newest = rank::newest_first(entries.iter().copied());
        for record in newest.iter().take(limits.top_newest) {
            selection.visible.insert(record.id.clone());
        }

        let accessed = rank::most_accessed(entries.iter().copied(), now);
        for scored in accessed.iter().take(limits.top_accessed) {
            selection.visible.insert(scored.item.id.clone());
            selection.promoted.insert(scored.item.id.clone());
        }

        debug!(
            category = %category,
            active = entries.len(),
            newest = newest.len().min(limits.top_newest),
            promoted = accessed.len().min(limits.top_accessed),
            "Category selection"
        );
    }

    for record in records.iter().filter(|r| r.is_active() && r.favorite) {
        selection.visible.insert(record.id.clone());
    }

    selection.visible_obsolete = rank::by_score(records.iter().filter(|r| r.obsolete), now)
        .into_iter()
        .take(limits.top_obsolete)
        .map(|scored| scored.item.id.clone())
        .collect();

    let undated = raw_count_fallbacks(records);
    if undated > 0 {
        warn!(
            undated,
            "Accessed records without a parseable created_at score by raw access count"
        );
    }

    selection
}

/// Accessed records whose score falls back to the raw access count.
fn raw_count_fallbacks(records: &[Record]) -> usize {
    records
        .iter()
        .filter(|r| r.access_count > 0 && parse_timestamp(&r.created_at).is_none())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{now, record};

    fn limits(top_newest: usize, top_accessed: usize, top_obsolete: usize) -> BulkReadConfig {
        BulkReadConfig {
            top_newest,
            top_accessed,
            top_obsolete,
            ..BulkReadConfig::default()
        }
    }

    /// 15 active "P" records: P0001 oldest ... P0015 newest, none accessed,
    /// except P0002 (two years old, 200 accesses) and P0006 (10 accesses).
    fn project_category() -> Vec<Record> {
        let mut records: Vec<Record> = (1..=15u32)
            .map(|i| record(&format!("P{i:04}"), 'P', i, i64::from(16 - i) * 10, 0))
            .collect();
        records[1].created_at = crate::test_helpers::days_ago(730);
        records[1].access_count = 200;
        records[5].access_count = 10;
        records
    }

    #[test]
    fn scenario_newest_and_most_accessed_per_category() {
        let records = project_category();
        let sel = select(&records, &limits(5, 3, 3), now());

        // Newest five, none of them accessed
        for id in ["P0015", "P0014", "P0013", "P0012", "P0011"] {
            assert!(sel.is_visible(id), "{id} should be visible");
            assert!(!sel.is_promoted(id));
        }
        // Only two records have accesses, so only two promotions
        assert_eq!(
            sel.promoted,
            BTreeSet::from(["P0002".to_string(), "P0006".to_string()])
        );
        // Unaccessed, not newest, not favorite → hidden
        for id in ["P0001", "P0003", "P0004", "P0005", "P0007", "P0010"] {
            assert!(!sel.is_visible(id), "{id} should be hidden");
        }
        assert_eq!(sel.visible.len(), 7);
    }

    #[test]
    fn categories_do_not_share_budget() {
        let mut records = project_category();
        records.extend((1..=3u32).map(|i| record(&format!("L{i:04}"), 'L', i, 1, 0)));
        let sel = select(&records, &limits(2, 0, 0), now());

        let p: Vec<&String> = sel.visible.iter().filter(|id| id.starts_with('P')).collect();
        let l: Vec<&String> = sel.visible.iter().filter(|id| id.starts_with('L')).collect();
        assert_eq!(p.len(), 2);
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn favorites_survive_zero_caps() {
        let mut records = project_category();
        records[0].favorite = true;
        let sel = select(&records, &limits(0, 0, 0), now());
        assert_eq!(sel.visible, BTreeSet::from(["P0001".to_string()]));
        assert!(sel.promoted.is_empty());
        assert!(sel.visible_obsolete.is_empty());
    }

    #[test]
    fn obsolete_records_never_enter_visible() {
        let mut records = project_category();
        records[14].obsolete = true;
        records[14].favorite = true;
        records[1].obsolete = true;
        let sel = select(&records, &limits(5, 3, 3), now());

        assert!(!sel.is_visible("P0015"));
        assert!(!sel.is_visible("P0002"));
        assert_eq!(sel.visible_obsolete, vec!["P0002".to_string(), "P0015".to_string()]);
        // P0010 slides into the newest five
        assert!(sel.is_visible("P0010"));
    }

    #[test]
    fn obsolete_channel_takes_highest_scores_across_categories() {
        let records: Vec<Record> = (1..=10u32)
            .map(|i| {
                let category = if i % 2 == 0 { 'E' } else { 'L' };
                let mut r = record(&format!("{category}{i:04}"), category, i, 30, u64::from(i));
                r.obsolete = true;
                r
            })
            .collect();
        let sel = select(&records, &limits(5, 3, 3), now());
        assert_eq!(sel.visible_obsolete, vec!["E0010", "L0009", "E0008"]);
        assert!(sel.visible.is_empty());
    }

    #[test]
    fn promoted_is_subset_of_visible() {
        let mut records = project_category();
        for (i, r) in records.iter_mut().enumerate() {
            r.access_count = (i as u64 * 7) % 5;
        }
        let sel = select(&records, &limits(1, 4, 0), now());
        assert!(sel.promoted.is_subset(&sel.visible));
        assert!(sel.promoted.len() <= 4);
    }

    #[test]
    fn selection_is_idempotent() {
        let records = project_category();
        let first = select(&records, &limits(5, 3, 3), now());
        let second = select(&records, &limits(5, 3, 3), now());
        assert_eq!(first, second);
    }

    #[test]
    fn raising_top_newest_never_shrinks_visible() {
        let records = project_category();
        let mut previous = BTreeSet::new();
        for n in 0..=16 {
            let sel = select(&records, &limits(n, 3, 0), now());
            assert!(previous.is_subset(&sel.visible), "shrank at top_newest={n}");
            previous = sel.visible;
        }
        assert_eq!(previous.len(), 15);
    }

    #[test]
    fn equal_timestamps_fill_exactly_the_cap() {
        let records: Vec<Record> = (1..=6u32)
            .map(|i| record(&format!("T{i:04}"), 'T', i, 3, 0))
            .collect();
        let sel = select(&records, &limits(4, 0, 0), now());
        assert_eq!(
            sel.visible,
            BTreeSet::from_iter(["T0006", "T0005", "T0004", "T0003"].map(String::from))
        );
    }

    #[test]
    fn undated_record_is_promoted_by_raw_count() {
        let mut records = project_category();
        // P0004: 120 days old and never accessed until now
        records[3].created_at = "not a date".into();
        records[3].access_count = 3;
        let sel = select(&records, &limits(5, 2, 0), now());

        // raw 3.0 beats P0006's decayed 10 / log2(102)
        assert_eq!(
            sel.promoted,
            BTreeSet::from(["P0002".to_string(), "P0004".to_string()])
        );
        assert!(!sel.is_visible("P0006"));
    }

    #[test]
    fn only_accessed_undated_records_fall_back() {
        let mut records = project_category();
        records[3].created_at = "not a date".into();
        records[4].created_at = String::new();
        records[4].access_count = 2;
        records[5].obsolete = true;
        records[5].created_at = "garbage".into();
        // P0004 has no accesses; P0005 and P0006 (10 accesses) fall back
        assert_eq!(raw_count_fallbacks(&records), 2);
    }

    #[test]
    fn empty_input_selects_nothing() {
        let sel = select(&[], &limits(5, 3, 3), now());
        assert_eq!(sel, Selection::default());
        assert_eq!(sel.shown_count(), 0);
    }
}
