//! Deterministic orderings shared by selection and capping.
//!
//! Two rankings exist, and both are total orders so that equal keys can
//! never make a channel drop or duplicate an item:
//!
//! - **newest**: `created_at` desc (unparseable last), then `seq` desc, then id asc
//! - **by score**: score desc, then `access_count` desc, then id asc

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use hmem_core::model::Scorable;
use hmem_core::time::parse_timestamp;

use crate::score::{ScoredItem, score};

/// Items sorted newest first.
pub fn newest_first<'a, T: Scorable>(items: impl IntoIterator<Item = &'a T>) -> Vec<&'a T> {
    let mut keyed: Vec<(Option<DateTime<Utc>>, &'a T)> = items
        .into_iter()
        .map(|item| (parse_timestamp(item.created_at()), item))
        .collect();

    keyed.sort_by(|(ta, a), (tb, b)| {
        cmp_created_desc(ta, tb)
            .then_with(|| b.seq().cmp(&a.seq()))
            .then_with(|| a.id().cmp(b.id()))
    });

    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Items with at least one access, highest score first.
pub fn most_accessed<'a, T: Scorable>(
    items: impl IntoIterator<Item = &'a T>,
    now: DateTime<Utc>,
) -> Vec<ScoredItem<'a, T>> {
    by_score(items.into_iter().filter(|item| item.access_count() > 0), now)
}

/// All items, highest score first. Zero-access items sort by id at the end.
pub fn by_score<'a, T: Scorable>(
    items: impl IntoIterator<Item = &'a T>,
    now: DateTime<Utc>,
) -> Vec<ScoredItem<'a, T>> {
    let mut scored: Vec<ScoredItem<'a, T>> = items
        .into_iter()
        .map(|item| ScoredItem {
            item,
            score: score(item, now),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.item.access_count().cmp(&a.item.access_count()))
            .then_with(|| a.item.id().cmp(b.item.id()))
    });

    scored
}

fn cmp_created_desc(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
